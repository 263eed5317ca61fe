//! Periodic refresh.
//!
//! The timer never waits for the view: if a render holds the lock the tick
//! is dropped and the next one tries again.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::index::MetadataIndex;
use crate::render::CanvasRenderer;
use super::GraphView;

/// Background task ticking a shared view. Cancelled on `cancel()` or drop.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    /// Must be called inside a tokio runtime.
    pub fn spawn<I, R>(view: Arc<Mutex<GraphView<I, R>>>, period: Duration) -> Self
    where
        I: MetadataIndex + Send + 'static,
        R: CanvasRenderer + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(mut view) = view.try_lock() else {
                    debug!("render in flight, refresh tick skipped");
                    continue;
                };
                if let Err(err) = view.tick() {
                    warn!(error = %err, "periodic refresh failed");
                }
            }
        });
        Self { handle: Some(handle) }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking. Takes effect before the next tick.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
