//! Event sources: swappable strategies for fetching account history.
//!
//! Every variant implements [`EventSource`] over the shared
//! [`HistoryService`](crate::indexer::HistoryService):
//!
//! - [`AllEventsSource`] passes everything through.
//! - [`NativeTransferSource`] keeps only native-coin transfers.
//! - [`TokenEventsSource`] queries the history of one fungible token.

pub mod all_events;
pub mod native_transfer;
pub mod token_events;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use all_events::AllEventsSource;
pub use native_transfer::NativeTransferSource;
pub use token_events::TokenEventsSource;

use crate::domain::{AccountAddress, Event, EventPage, TokenAddress};
use crate::error::ActivityError;
use crate::indexer::HistoryService;

/// Strategy for fetching one scope of an account's history.
#[async_trait]
pub trait EventSource: Send + Sync + std::fmt::Debug {
    /// Returns the locally cached first page.
    ///
    /// # Errors
    ///
    /// Any error means "no cache available" to the caller.
    fn cached_events(&self, account: &AccountAddress) -> Result<EventPage, ActivityError>;

    /// Loads one page older than `before_cursor` from the network.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures.
    async fn load_events(
        &self,
        account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError>;

    /// Loads a single event by id.
    ///
    /// # Errors
    ///
    /// Propagates indexer failures; filtering sources also report
    /// [`ActivityError::EventNotFound`] when the event is outside their scope.
    async fn load_event(
        &self,
        account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError>;
}

/// Which slice of history a feed shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedScope {
    /// Every event.
    #[default]
    All,
    /// Native-coin transfers only.
    Native,
    /// Events of a single fungible token, by master contract address.
    Token(TokenAddress),
}

impl FeedScope {
    /// Builds the event source serving this scope.
    #[must_use]
    pub fn source(&self, service: HistoryService) -> Arc<dyn EventSource> {
        match self {
            Self::All => Arc::new(AllEventsSource::new(service)),
            Self::Native => Arc::new(NativeTransferSource::new(service)),
            Self::Token(token) => Arc::new(TokenEventsSource::new(service, token.clone())),
        }
    }
}
