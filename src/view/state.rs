//! Render re-entrancy as an explicit state machine.
//!
//! | State | Event | Next | Action |
//! |-------|-------|------|--------|
//! | Idle | Navigation | Rendering | render |
//! | Idle | VaultChanged | PendingRefresh | - |
//! | PendingRefresh | VaultChanged | PendingRefresh | - (coalesced) |
//! | PendingRefresh | TimerTick | Rendering | rebuild and render |
//! | PendingRefresh | Navigation | Rendering, refresh kept | render |
//! | Rendering | TimerTick | Rendering | skip |
//! | Rendering | VaultChanged | Rendering, refresh kept | - |
//! | Rendering | RenderCompleted | PendingRefresh or Idle | - |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewState {
    #[default]
    Idle,
    /// A render is in flight. `refresh_pending` remembers a vault change
    /// seen meanwhile.
    Rendering { refresh_pending: bool },
    /// The vault changed; the next timer tick rebuilds.
    PendingRefresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    NavigationRequested(String),
    VaultChanged,
    TimerTick,
    RenderCompleted,
}

/// Work the controller has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Render(String),
    RebuildAndRender,
    SkipTick,
}

/// Pure transition function.
pub fn transition(state: ViewState, event: &ViewEvent) -> (ViewState, Action) {
    use ViewEvent::*;
    use ViewState::*;

    match (state, event) {
        (Idle, NavigationRequested(path)) => (Rendering { refresh_pending: false }, Action::Render(path.clone())),
        (PendingRefresh, NavigationRequested(path)) => {
            (Rendering { refresh_pending: true }, Action::Render(path.clone()))
        }
        (Rendering { refresh_pending }, NavigationRequested(path)) => {
            (Rendering { refresh_pending }, Action::Render(path.clone()))
        }

        (Idle | PendingRefresh, VaultChanged) => (PendingRefresh, Action::None),
        (Rendering { .. }, VaultChanged) => (Rendering { refresh_pending: true }, Action::None),

        (Idle, TimerTick) => (Idle, Action::None),
        (PendingRefresh, TimerTick) => (Rendering { refresh_pending: false }, Action::RebuildAndRender),
        (Rendering { refresh_pending }, TimerTick) => (Rendering { refresh_pending }, Action::SkipTick),

        (Rendering { refresh_pending: true }, RenderCompleted) => (PendingRefresh, Action::None),
        (Rendering { refresh_pending: false }, RenderCompleted) => (Idle, Action::None),
        (other, RenderCompleted) => (other, Action::None),
    }
}
