//! History of a single fungible token.

use async_trait::async_trait;

use super::EventSource;
use crate::domain::{AccountAddress, Event, EventPage, TokenAddress};
use crate::error::ActivityError;
use crate::indexer::HistoryService;

/// Source scoped to one token contract.
///
/// Filtering happens on the indexer side; pages are returned unchanged.
#[derive(Debug, Clone)]
pub struct TokenEventsSource {
    service: HistoryService,
    token: TokenAddress,
}

impl TokenEventsSource {
    /// Creates a source for `token`.
    #[must_use]
    pub const fn new(service: HistoryService, token: TokenAddress) -> Self {
        Self { service, token }
    }

    /// Returns the token this source is scoped to.
    #[must_use]
    pub const fn token(&self) -> &TokenAddress {
        &self.token
    }
}

#[async_trait]
impl EventSource for TokenEventsSource {
    fn cached_events(&self, account: &AccountAddress) -> Result<EventPage, ActivityError> {
        self.service.cached_token_events(account, &self.token)
    }

    async fn load_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        self.service
            .load_token_events(account, &self.token, before_cursor, limit)
            .await
    }

    async fn load_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        self.service.load_event(account, event_id).await
    }
}
