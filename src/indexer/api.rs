//! Network boundary toward the remote indexing service.

use async_trait::async_trait;

use crate::domain::{
    AccountAddress, Collectible, CollectibleAddress, Event, EventPage, TokenAddress,
};
use crate::error::ActivityError;

/// Remote indexing service queried for history and collectibles.
///
/// Implemented by [`super::HttpIndexerClient`] in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait IndexerApi: Send + Sync + std::fmt::Debug {
    /// Loads one page of account events older than `before_cursor`.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivityError`] on transport, status, or decode failure.
    async fn account_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError>;

    /// Loads one page of events touching a single fungible token.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivityError`] on transport, status, or decode failure.
    async fn token_events(
        &self,
        account: &AccountAddress,
        token: &TokenAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError>;

    /// Loads a single event of the account.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivityError`] on transport, status, or decode failure.
    async fn account_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError>;

    /// Loads collectibles in one batch. Unknown addresses are omitted.
    ///
    /// # Errors
    ///
    /// Returns an [`ActivityError`] on transport, status, or decode failure.
    async fn collectibles(
        &self,
        addresses: &[CollectibleAddress],
    ) -> Result<Vec<Collectible>, ActivityError>;
}
