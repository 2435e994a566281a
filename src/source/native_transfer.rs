//! History filtered down to native-coin transfers.

use async_trait::async_trait;

use super::EventSource;
use crate::domain::{AccountAddress, Action, Event, EventPage};
use crate::error::ActivityError;
use crate::indexer::HistoryService;

/// Source keeping only native-coin transfers.
///
/// The same filter runs on cached and live pages so both views stay
/// comparable: events without a native transfer are dropped, and the
/// remaining events keep only their native-transfer actions. A filtered
/// page may therefore come back empty while `next_cursor` still points at
/// older history; the paginator skips ahead over such pages.
#[derive(Debug, Clone)]
pub struct NativeTransferSource {
    service: HistoryService,
}

impl NativeTransferSource {
    /// Creates the source.
    #[must_use]
    pub const fn new(service: HistoryService) -> Self {
        Self { service }
    }
}

fn native_only(event: Event) -> Option<Event> {
    event.retain_actions(Action::is_native_transfer)
}

#[async_trait]
impl EventSource for NativeTransferSource {
    fn cached_events(&self, account: &AccountAddress) -> Result<EventPage, ActivityError> {
        Ok(self.service.cached_events(account)?.filter_events(native_only))
    }

    async fn load_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        let page = self
            .service
            .load_events(account, before_cursor, limit)
            .await?;
        Ok(page.filter_events(native_only))
    }

    async fn load_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        let event = self.service.load_event(account, event_id).await?;
        native_only(event).ok_or_else(|| ActivityError::EventNotFound(event_id.to_string()))
    }
}
