//! Best-effort collectible resolution for history pages.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::CollectibleStore;
use crate::domain::{Collectible, CollectibleAddress, Collectibles, Event};
use crate::indexer::IndexerApi;

/// Resolves collectibles referenced by history events.
///
/// Neither path ever fails: unresolved addresses are simply absent from
/// the returned map and the owning event renders a placeholder.
#[derive(Debug, Clone)]
pub struct CollectibleResolver {
    store: Arc<dyn CollectibleStore>,
    api: Arc<dyn IndexerApi>,
}

impl CollectibleResolver {
    /// Creates a resolver over a local store and the remote indexer.
    #[must_use]
    pub fn new(store: Arc<dyn CollectibleStore>, api: Arc<dyn IndexerApi>) -> Self {
        Self { store, api }
    }

    /// Resolves collectibles for events read from the local cache.
    ///
    /// Transfers are looked up in the local store only. Purchases carry the
    /// collectible inline; it is saved to the store and included.
    #[must_use]
    pub fn resolve_cached(&self, events: &[Event]) -> Collectibles {
        let mut resolved = Collectibles::new();
        for event in events {
            for address in event.collectible_references() {
                if let Some(collectible) = self.store.get(address) {
                    resolved.insert(address.clone(), collectible);
                }
            }
        }
        self.warm_purchases(events, &mut resolved);
        resolved
    }

    /// Resolves collectibles for a page freshly loaded from the network.
    ///
    /// Every distinct transfer reference is requested in one batch call.
    /// Loaded items and purchase payloads are saved to the store.
    pub async fn resolve_loaded(&self, events: &[Event]) -> Collectibles {
        let mut resolved = Collectibles::new();

        let addresses: Vec<CollectibleAddress> = events
            .iter()
            .flat_map(|event| event.collectible_references())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if !addresses.is_empty() {
            match self.api.collectibles(&addresses).await {
                Ok(items) => {
                    for collectible in items {
                        self.save(&collectible);
                        resolved.insert(collectible.address.clone(), collectible);
                    }
                }
                Err(err) => {
                    tracing::debug!(
                        count = addresses.len(),
                        error = %err,
                        "collectible batch failed; leaving references unresolved"
                    );
                }
            }
        }

        self.warm_purchases(events, &mut resolved);
        resolved
    }

    fn warm_purchases(&self, events: &[Event], resolved: &mut Collectibles) {
        for collectible in events.iter().flat_map(|event| event.purchased_collectibles()) {
            self.save(collectible);
            resolved.insert(collectible.address.clone(), collectible.clone());
        }
    }

    fn save(&self, collectible: &Collectible) {
        if let Err(err) = self.store.save(collectible) {
            tracing::debug!(address = %collectible.address, error = %err, "collectible not cached");
        }
    }
}
