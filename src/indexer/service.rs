//! History service: cache-or-network access to account history.

use std::sync::Arc;

use crate::domain::{AccountAddress, Event, EventPage, TokenAddress};
use crate::error::ActivityError;

use super::{EventCache, HistoryScope, IndexerApi};

/// Backend shared by every event source.
///
/// Cached reads are synchronous and never hit the network. Network loads
/// of a first page (no cursor) refresh the cache as a side effect; a cache
/// write failure is logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct HistoryService {
    api: Arc<dyn IndexerApi>,
    cache: Arc<EventCache>,
}

impl HistoryService {
    /// Creates a service over `api` with the given cache.
    #[must_use]
    pub fn new(api: Arc<dyn IndexerApi>, cache: Arc<EventCache>) -> Self {
        Self { api, cache }
    }

    /// Returns the remote indexer.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn IndexerApi> {
        &self.api
    }

    /// Returns the cached first page of all account events.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::CacheMiss`] if nothing is cached.
    pub fn cached_events(&self, account: &AccountAddress) -> Result<EventPage, ActivityError> {
        self.cache.get(account, &HistoryScope::All)
    }

    /// Loads a page of all account events.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures.
    pub async fn load_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        let page = self
            .api
            .account_events(account, before_cursor, limit)
            .await?;
        if before_cursor.is_none() {
            self.store(account, HistoryScope::All, &page);
        }
        Ok(page)
    }

    /// Returns the cached first page of events touching `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::CacheMiss`] if nothing is cached.
    pub fn cached_token_events(
        &self,
        account: &AccountAddress,
        token: &TokenAddress,
    ) -> Result<EventPage, ActivityError> {
        self.cache
            .get(account, &HistoryScope::Token(token.clone()))
    }

    /// Loads a page of events touching `token`.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures.
    pub async fn load_token_events(
        &self,
        account: &AccountAddress,
        token: &TokenAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        let page = self
            .api
            .token_events(account, token, before_cursor, limit)
            .await?;
        if before_cursor.is_none() {
            self.store(account, HistoryScope::Token(token.clone()), &page);
        }
        Ok(page)
    }

    /// Loads a single event.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures.
    pub async fn load_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        self.api.account_event(account, event_id).await
    }

    fn store(&self, account: &AccountAddress, scope: HistoryScope, page: &EventPage) {
        if let Err(err) = self.cache.put(account, scope, page.clone()) {
            tracing::warn!(%account, error = %err, "failed to cache first history page");
        }
    }
}
