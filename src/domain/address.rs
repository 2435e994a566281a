//! Type-safe on-chain addresses.
//!
//! Accounts, collectibles and fungible-token contracts are all identified by
//! raw address strings on the wire. The newtypes here keep them from being
//! confused with each other across the history engine.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! address_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw address string.
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Returns the raw address string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

address_newtype!(
    /// Address of a wallet account whose history is being paginated.
    AccountAddress
);

address_newtype!(
    /// Address of a collectible (NFT) item.
    CollectibleAddress
);

address_newtype!(
    /// Address of a fungible-token (jetton) master contract.
    TokenAddress
);
