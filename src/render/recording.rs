//! In-memory canvas.
//!
//! Reference implementation of `CanvasRenderer`: elements are kept in a
//! map and the published z-order in a vector. Text is measured with a fixed
//! per-character advance, which keeps layouts deterministic in tests.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::model::{Point, Size};
use crate::{Error, Result};
use super::{
    ArrowOptions, CanvasRenderer, Element, ElementId, ElementKind, Notifier, StyleContext,
    TextOptions,
};

/// Character advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f64 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_RATIO: f64 = 1.25;

/// Canvas that records what was drawn.
#[derive(Debug)]
pub struct RecordingCanvas {
    ready: bool,
    reject_publish: bool,
    style: StyleContext,
    elements: HashMap<ElementId, Element>,
    scene: Vec<ElementId>,
    next_id: u64,
    next_group: u64,
    frames: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            ready: true,
            reject_publish: false,
            style: StyleContext::default(),
            elements: HashMap::new(),
            scene: Vec::new(),
            next_id: 1,
            next_group: 1,
            frames: 0,
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Make `update_scene` fail while the canvas stays mounted.
    pub fn set_reject_publish(&mut self, reject: bool) {
        self.reject_publish = reject;
    }

    /// Elements held by the canvas, published or not.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Elements of the last published frame, bottom first.
    pub fn scene(&self) -> Vec<&Element> {
        self.scene.iter().filter_map(|id| self.elements.get(id)).collect()
    }

    /// Text elements of the last frame, by label.
    pub fn text_by_label(&self, label: &str) -> Option<&Element> {
        self.scene().into_iter().find(|e| matches!(&e.kind, ElementKind::Text { label: l } if l == label))
    }

    pub fn arrows(&self) -> Vec<&Element> {
        self.scene().into_iter().filter(|e| matches!(e.kind, ElementKind::Arrow { .. })).collect()
    }

    /// Number of published frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn push(&mut self, kind: ElementKind, position: Point, size: Size, link: Option<String>) -> ElementId {
        let id = ElementId(format!("el-{}", self.next_id));
        self.next_id += 1;
        self.elements.insert(
            id.clone(),
            Element {
                id: id.clone(),
                kind,
                position,
                size,
                style: self.style.clone(),
                link,
                group: None,
            },
        );
        id
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasRenderer for RecordingCanvas {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn clear(&mut self) {
        let published: HashSet<&ElementId> = self.scene.iter().collect();
        self.elements.retain(|id, _| published.contains(id));
    }

    fn set_style(&mut self, style: &StyleContext) {
        self.style = style.clone();
    }

    fn measure_text(&self, text: &str) -> Size {
        let lines: Vec<&str> = text.lines().collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            longest as f64 * self.style.font_size * CHAR_WIDTH_RATIO,
            lines.len().max(1) as f64 * self.style.font_size * LINE_HEIGHT_RATIO,
        )
    }

    fn add_text_box(&mut self, position: Point, label: &str, options: &TextOptions) -> ElementId {
        let text = self.measure_text(label);
        let size = Size::new(
            text.width + 2.0 * options.box_padding,
            text.height + 2.0 * options.box_padding,
        );
        self.push(
            ElementKind::Text { label: label.to_string() },
            position,
            size,
            options.link.clone(),
        )
    }

    fn add_ellipse(&mut self, position: Point, size: Size) -> ElementId {
        self.push(ElementKind::Ellipse, position, size, None)
    }

    fn connect(&mut self, from: &ElementId, to: &ElementId, _options: &ArrowOptions) -> ElementId {
        let (a, b) = match (self.elements.get(from), self.elements.get(to)) {
            (Some(a), Some(b)) => (a.center(), b.center()),
            _ => (Point::ORIGIN, Point::ORIGIN),
        };
        let position = Point::new(a.x.min(b.x), a.y.min(b.y));
        let size = Size::new((a.x - b.x).abs(), (a.y - b.y).abs());
        self.push(
            ElementKind::Arrow { from: from.clone(), to: to.clone() },
            position,
            size,
            None,
        )
    }

    fn group(&mut self, ids: &[ElementId]) -> String {
        let group = format!("group-{}", self.next_group);
        self.next_group += 1;
        for id in ids {
            if let Some(el) = self.elements.get_mut(id) {
                el.group = Some(group.clone());
            }
        }
        group
    }

    fn get_element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    fn update_scene(&mut self, order: &[ElementId]) -> Result<()> {
        if !self.ready {
            return Err(Error::RendererUnavailable("canvas is not mounted".into()));
        }
        if self.reject_publish {
            return Err(Error::RendererUnavailable("canvas rejected the frame".into()));
        }
        if let Some(missing) = order.iter().find(|id| !self.elements.contains_key(*id)) {
            return Err(Error::NotFound(format!("canvas element {missing}")));
        }
        self.scene = order.to_vec();
        self.frames += 1;
        Ok(())
    }
}

/// Notifier that keeps every message, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
