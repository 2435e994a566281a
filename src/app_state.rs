//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::service::{HistoryController, Trigger};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// History controller owning the active paginator.
    pub controller: Arc<HistoryController>,
    /// Sender side of the controller's trigger loop.
    pub triggers: mpsc::Sender<Trigger>,
}

impl AppState {
    /// Spawns the controller's trigger loop and wraps both halves.
    #[must_use]
    pub fn spawn(controller: Arc<HistoryController>, trigger_capacity: usize) -> Self {
        let (triggers, _loop) = Arc::clone(&controller).spawn(trigger_capacity);
        Self {
            controller,
            triggers,
        }
    }
}
