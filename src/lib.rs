//! # activity-gateway
//!
//! Wallet activity-feed engine: cached, cursor-paginated account history
//! grouped into date sections, enriched with collectible metadata, and
//! served over HTTP and WebSocket.
//!
//! The first page of a feed is painted from the local cache before the
//! indexer answers, then replaced by the live page. Older pages are
//! fetched on demand. Filtered feeds (native transfers, a single token)
//! skip ahead over pages the filter emptied.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── HistoryController → HistoryPaginator (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── EventSource: all / native / token (source/)
//!     ├── CollectibleResolver + store (collectible/)
//!     │
//!     └── HistoryService → EventCache + IndexerApi (indexer/)
//! ```

pub mod api;
pub mod app_state;
pub mod collectible;
pub mod config;
pub mod domain;
pub mod error;
pub mod indexer;
pub mod service;
pub mod source;
pub mod ws;

#[cfg(test)]
mod test_support;
