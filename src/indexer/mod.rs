//! Indexer layer: remote indexing API, local history cache, and the
//! service combining both.
//!
//! [`HistoryService`] is the cache-or-network backend every event source
//! delegates to. It talks to the remote indexer through the [`IndexerApi`]
//! trait and writes each freshly loaded first page into the
//! [`EventCache`] so the next activation can paint instantly.

pub mod api;
pub mod cache;
pub mod client;
pub mod service;

pub use api::IndexerApi;
pub use cache::{EventCache, HistoryScope};
pub use client::HttpIndexerClient;
pub use service::HistoryService;
