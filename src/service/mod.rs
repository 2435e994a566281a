//! Service layer: history orchestration.
//!
//! [`HistoryPaginator`] is the per-account pagination state machine.
//! [`HistoryController`] consumes external triggers, owns the active
//! paginator, and forwards commands to it. Both emit through the
//! [`crate::domain::EventBus`].

pub mod controller;
pub mod paginator;

pub use controller::{HistoryController, Trigger};
pub use paginator::HistoryPaginator;
