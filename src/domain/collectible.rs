//! Collectible (NFT) items referenced from history actions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::CollectibleAddress;

/// Display metadata of a collectible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleMetadata {
    /// Item name.
    #[serde(default)]
    pub name: Option<String>,
    /// Preview image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the collection the item belongs to.
    #[serde(default)]
    pub collection_name: Option<String>,
}

/// A collectible item.
///
/// Events only reference collectibles by address for transfers; purchases
/// carry the full value inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    /// On-chain address of the item.
    pub address: CollectibleAddress,
    /// Display metadata.
    #[serde(default)]
    pub metadata: CollectibleMetadata,
}

impl Collectible {
    /// Creates a collectible with empty metadata.
    #[must_use]
    pub fn new(address: CollectibleAddress) -> Self {
        Self {
            address,
            metadata: CollectibleMetadata::default(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = Some(name.into());
        self
    }
}

/// Resolved collectibles keyed by address.
pub type Collectibles = HashMap<CollectibleAddress, Collectible>;
