//! # Canvas Renderer Contract
//!
//! The drawing surface is an external collaborator. The engine only pushes
//! shapes into it and never reads pixels back.
//!
//! ## Implementations
//!
//! | Renderer | Module | Description |
//! |----------|--------|-------------|
//! | `RecordingCanvas` | `recording` | In-memory element list for testing/embedding |

pub mod style;
pub mod recording;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{Point, Size};
use crate::{Error, Result};

pub use recording::{RecordingCanvas, RecordingNotifier};
pub use style::{
    Arrowhead, FillStyle, LinkStyle, NodeStyle, NodeStyleOverride, StrokeStyle, StyleContext,
    StyleSettings,
};

/// Readiness retries before giving up on the canvas.
pub const RENDERER_READY_ATTEMPTS: u32 = 10;
pub const RENDERER_READY_DELAY: Duration = Duration::from_millis(50);

/// Opaque canvas element identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Text { label: String },
    Ellipse,
    Arrow { from: ElementId, to: ElementId },
}

/// One drawn element as the canvas holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Top-left corner.
    pub position: Point,
    pub size: Size,
    pub style: StyleContext,
    /// Page path the element navigates to when clicked.
    pub link: Option<String>,
    pub group: Option<String>,
}

impl Element {
    pub fn center(&self) -> Point {
        self.position.offset(self.size.width / 2.0, self.size.height / 2.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    pub box_padding: f64,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrowOptions {
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

/// The drawing surface.
pub trait CanvasRenderer {
    /// The surface is mounted and accepts elements.
    fn is_ready(&self) -> bool;

    /// Drop every element that is not part of the published scene. Called
    /// after each publish attempt, so a rejected frame leaves the previous
    /// one intact.
    fn clear(&mut self);

    /// Style applied to elements added after this call.
    fn set_style(&mut self, style: &StyleContext);

    /// Size of `text` in the current style.
    fn measure_text(&self, text: &str) -> Size;

    /// Add a boxed label with its top-left corner at `position`.
    fn add_text_box(&mut self, position: Point, label: &str, options: &TextOptions) -> ElementId;

    fn add_ellipse(&mut self, position: Point, size: Size) -> ElementId;

    /// Arrow bound to both elements.
    fn connect(&mut self, from: &ElementId, to: &ElementId, options: &ArrowOptions) -> ElementId;

    /// Group elements so they move together; returns the group id.
    fn group(&mut self, ids: &[ElementId]) -> String;

    fn get_element(&self, id: &ElementId) -> Option<&Element>;

    /// Publish the frame. `order` is the z-order, bottom first.
    fn update_scene(&mut self, order: &[ElementId]) -> Result<()>;
}

/// User-visible notices ("index still updating", "canvas not ready").
pub trait Notifier {
    fn notice(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notice(&self, message: &str) {
        (**self).notice(message);
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, message: &str) {
        info!(message, "notice");
    }
}

/// Wait until the canvas is ready, retrying `attempts` times `delay` apart.
/// This is the one hard timeout in the engine.
pub async fn wait_for_renderer<R>(
    renderer: &R,
    notifier: &dyn Notifier,
    attempts: u32,
    delay: Duration,
) -> Result<()>
where
    R: CanvasRenderer + ?Sized,
{
    for attempt in 0..attempts {
        if renderer.is_ready() {
            return Ok(());
        }
        debug!(attempt, "canvas not ready, retrying");
        tokio::time::sleep(delay).await;
    }
    if renderer.is_ready() {
        return Ok(());
    }
    notifier.notice("The drawing canvas did not become ready. Please reopen the view.");
    Err(Error::RendererTimeout { attempts })
}
