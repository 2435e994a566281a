//! Collectible resolution: local store plus batched network loads.
//!
//! History events reference collectibles by address (transfers) or carry
//! them inline (purchases). [`CollectibleResolver`] turns a batch of events
//! into a map of resolved collectibles on a best-effort basis and warms the
//! [`CollectibleStore`] along the way.

pub mod resolver;
pub mod store;

pub use resolver::CollectibleResolver;
pub use store::{CollectibleStore, MemoryCollectibleStore};
