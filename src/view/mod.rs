//! # Graph View
//!
//! The controller a host embeds: owns the metadata index, the canvas, the
//! current registry and the navigation history, and turns host events into
//! renders through the state machine in [`state`].
//!
//! ```rust,no_run
//! use pagegraph::{GraphView, MemoryIndex, RecordingCanvas, Settings};
//!
//! # async fn example() -> pagegraph::Result<()> {
//! let mut index = MemoryIndex::new();
//! index.add_file("Rust.md").add_file("Cargo.md");
//! index.add_link("Rust.md", "Cargo");
//!
//! let mut view = GraphView::new(index, RecordingCanvas::new(), Settings::default())?;
//! view.open(Some("Rust.md")).await?;
//! view.vault_changed();
//! view.tick()?;
//! # Ok(())
//! # }
//! ```

pub mod state;
pub mod timer;

use std::time::Duration;

use tracing::{debug, info};

use crate::context::IndexContext;
use crate::index::{build_pages, wait_for_index, MetadataIndex, INDEX_NOTICE_EVERY, INDEX_POLL_INTERVAL};
use crate::registry::Pages;
use crate::render::{wait_for_renderer, CanvasRenderer, LogNotifier, Notifier, RENDERER_READY_ATTEMPTS, RENDERER_READY_DELAY};
use crate::scene::render_page;
use crate::settings::{NavigationHistory, Settings};
use crate::Result;

pub use state::{transition, Action, ViewEvent, ViewState};
pub use timer::RefreshTimer;

pub struct GraphView<I, R> {
    index: I,
    renderer: R,
    ctx: IndexContext,
    pages: Pages,
    state: ViewState,
    history: NavigationHistory,
    central: Option<String>,
    notifier: Box<dyn Notifier + Send + Sync>,
    rebuilds: u64,
}

impl<I, R> GraphView<I, R>
where
    I: MetadataIndex,
    R: CanvasRenderer,
{
    /// A view over `index`. Settings are validated and normalized, then the
    /// registry is built right away; call [`open`](Self::open) to wait for
    /// the host before the first render.
    pub fn new(index: I, renderer: R, settings: Settings) -> Result<Self> {
        let ctx = IndexContext::new(settings.validated()?);
        let (pages, _) = build_pages(&index, ctx.clone());
        Ok(Self {
            index,
            renderer,
            ctx,
            pages,
            state: ViewState::Idle,
            history: NavigationHistory::new(),
            central: None,
            notifier: Box::new(LogNotifier),
            rebuilds: 0,
        })
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + Send + Sync + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_history(mut self, history: NavigationHistory) -> Self {
        self.history = history;
        self
    }

    /// Wait for the index to settle and the canvas to mount, rebuild, then
    /// show `focal` (or the most recent history entry).
    pub async fn open(&mut self, focal: Option<&str>) -> Result<()> {
        wait_for_index(&self.index, self.notifier.as_ref(), INDEX_POLL_INTERVAL, INDEX_NOTICE_EVERY).await;
        wait_for_renderer(&self.renderer, self.notifier.as_ref(), RENDERER_READY_ATTEMPTS, RENDERER_READY_DELAY)
            .await?;
        self.rebuild();

        let target = focal.map(str::to_string).or_else(|| self.history.last().map(str::to_string));
        if let Some(path) = target {
            self.navigate(&path)?;
        }
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn navigate(&mut self, path: &str) -> Result<Action> {
        self.handle(ViewEvent::NavigationRequested(path.to_string()))
    }

    /// Record that the vault changed. Repeated calls collapse into one
    /// rebuild on the next tick.
    pub fn vault_changed(&mut self) {
        // VaultChanged never produces work
        let (next, _) = transition(self.state, &ViewEvent::VaultChanged);
        self.state = next;
    }

    pub fn tick(&mut self) -> Result<Action> {
        self.handle(ViewEvent::TimerTick)
    }

    /// Replace the settings snapshot, rebuild and redraw the current page.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.ctx = IndexContext::new(settings.validated()?);
        self.rebuild();
        if let Some(path) = self.central.clone() {
            self.navigate(&path)?;
        }
        Ok(())
    }

    pub fn handle(&mut self, event: ViewEvent) -> Result<Action> {
        let (next, action) = transition(self.state, &event);
        self.state = next;
        match &action {
            Action::None => {}
            Action::SkipTick => debug!("render in flight, refresh tick skipped"),
            Action::Render(path) => {
                let result = self.render(path);
                self.complete();
                result?;
            }
            Action::RebuildAndRender => {
                if self.index.is_reindexing() {
                    debug!("metadata index reindexing, refresh postponed");
                    self.state = ViewState::PendingRefresh;
                    return Ok(Action::None);
                }
                self.rebuild();
                let result = match self.central.clone() {
                    Some(path) => self.render(&path),
                    None => Ok(()),
                };
                self.complete();
                result?;
            }
        }
        Ok(action)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn central(&self) -> Option<&str> {
        self.central.as_deref()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    pub fn settings(&self) -> &Settings {
        self.ctx.settings()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Host-side edits; follow up with [`vault_changed`](Self::vault_changed).
    pub fn index_mut(&mut self) -> &mut I {
        &mut self.index
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Number of full registry rebuilds so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.ctx.settings().refresh_interval_ms)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn rebuild(&mut self) {
        let (pages, stats) = build_pages(&self.index, self.ctx.clone());
        self.pages = pages;
        self.rebuilds += 1;
        info!(pages = self.pages.len(), files = stats.files, rebuilds = self.rebuilds, "registry rebuilt");
    }

    fn render(&mut self, path: &str) -> Result<()> {
        if path == self.ctx.output_path() {
            debug!(path, "output drawing is never a focal page");
            return Ok(());
        }
        match render_page(&mut self.pages, &self.index, &mut self.renderer, path) {
            Ok(true) => {
                self.central = Some(path.to_string());
                self.history.push(path);
                Ok(())
            }
            Ok(false) => {
                self.history.remove(path);
                Ok(())
            }
            Err(err) => {
                self.notifier.notice(&format!("Could not draw {path}: {err}"));
                Err(err)
            }
        }
    }

    fn complete(&mut self) {
        let (next, _) = transition(self.state, &ViewEvent::RenderCompleted);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::index::MemoryIndex;
    use crate::render::{RecordingCanvas, RecordingNotifier};

    fn view() -> GraphView<MemoryIndex, RecordingCanvas> {
        let mut index = MemoryIndex::new();
        index.add_file("A.md").add_file("B.md");
        index.add_link("A.md", "B");
        GraphView::new(index, RecordingCanvas::new(), Settings::default()).unwrap()
    }

    #[tokio::test]
    async fn open_renders_the_focal_page() {
        let mut view = view();
        view.open(Some("A.md")).await.unwrap();
        assert_eq!(view.central(), Some("A.md"));
        assert_eq!(view.state(), ViewState::Idle);
        assert_eq!(view.renderer().frames(), 1);
        assert_eq!(view.history().last(), Some("A.md"));
    }

    #[test]
    fn missing_page_keeps_the_previous_frame() {
        let mut view = view();
        view.navigate("A.md").unwrap();
        view.navigate("Nowhere.md").unwrap();
        assert_eq!(view.central(), Some("A.md"));
        assert_eq!(view.renderer().frames(), 1);
        assert!(view.renderer().text_by_label("A").is_some());
    }

    #[test]
    fn refresh_waits_for_reindex() {
        let mut view = view();
        view.navigate("A.md").unwrap();
        let before = view.rebuilds();

        view.vault_changed();
        view.index().set_reindexing(true);
        assert_eq!(view.tick().unwrap(), Action::None);
        assert_eq!(view.state(), ViewState::PendingRefresh);
        assert_eq!(view.rebuilds(), before);

        view.index().set_reindexing(false);
        assert_eq!(view.tick().unwrap(), Action::RebuildAndRender);
        assert_eq!(view.rebuilds(), before + 1);
        assert_eq!(view.state(), ViewState::Idle);
    }

    #[test]
    fn unready_canvas_is_reported() {
        let notices = Arc::new(RecordingNotifier::default());
        let mut view = view().with_notifier(Arc::clone(&notices));
        view.renderer_mut().set_ready(false);
        assert!(view.navigate("A.md").is_err());
        assert_eq!(view.state(), ViewState::Idle);
        assert_eq!(notices.messages().len(), 1);
    }

    #[test]
    fn output_drawing_is_not_navigable() {
        let mut view = view();
        view.index_mut().add_file("pagegraph.md");
        view.vault_changed();
        view.tick().unwrap();
        view.navigate("pagegraph.md").unwrap();
        assert_eq!(view.central(), None);
    }
}
