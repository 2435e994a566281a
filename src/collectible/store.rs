//! Local collectible store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{Collectible, CollectibleAddress};
use crate::error::ActivityError;

/// Synchronous local cache of collectible metadata.
pub trait CollectibleStore: Send + Sync + std::fmt::Debug {
    /// Returns the stored collectible, if any.
    fn get(&self, address: &CollectibleAddress) -> Option<Collectible>;

    /// Stores or replaces a collectible.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Store`] if the store cannot be written.
    fn save(&self, collectible: &Collectible) -> Result<(), ActivityError>;
}

/// In-memory [`CollectibleStore`].
#[derive(Debug, Default)]
pub struct MemoryCollectibleStore {
    items: RwLock<HashMap<CollectibleAddress, Collectible>>,
}

impl MemoryCollectibleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored collectibles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CollectibleStore for MemoryCollectibleStore {
    fn get(&self, address: &CollectibleAddress) -> Option<Collectible> {
        self.items.read().ok()?.get(address).cloned()
    }

    fn save(&self, collectible: &Collectible) -> Result<(), ActivityError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| ActivityError::Store("collectible store lock poisoned".to_string()))?;
        items.insert(collectible.address.clone(), collectible.clone());
        Ok(())
    }
}
