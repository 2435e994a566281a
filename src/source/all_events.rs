//! Unfiltered account history.

use async_trait::async_trait;

use super::EventSource;
use crate::domain::{AccountAddress, Event, EventPage};
use crate::error::ActivityError;
use crate::indexer::HistoryService;

/// Pass-through source over every event of the account.
#[derive(Debug, Clone)]
pub struct AllEventsSource {
    service: HistoryService,
}

impl AllEventsSource {
    /// Creates the source.
    #[must_use]
    pub const fn new(service: HistoryService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl EventSource for AllEventsSource {
    fn cached_events(&self, account: &AccountAddress) -> Result<EventPage, ActivityError> {
        self.service.cached_events(account)
    }

    async fn load_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        self.service.load_events(account, before_cursor, limit).await
    }

    async fn load_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        self.service.load_event(account, event_id).await
    }
}
