//! Ledger events, their actions, and pages of history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountAddress, Collectible, CollectibleAddress, TokenAddress};

/// Cursor value signalling that no older history remains.
pub const END_OF_HISTORY: i64 = 0;

/// Outcome of a single action inside an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Action executed.
    #[default]
    Ok,
    /// Action was attempted but failed on chain.
    Failed,
}

/// What an action did.
///
/// Amounts are string-encoded to preserve full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Transfer of the ledger's native coin.
    NativeTransfer {
        /// Sending account.
        sender: AccountAddress,
        /// Receiving account.
        recipient: AccountAddress,
        /// Amount in the smallest native unit.
        amount: String,
        /// Optional text comment attached to the transfer.
        #[serde(default)]
        comment: Option<String>,
    },
    /// Transfer of a fungible token.
    FungibleTokenTransfer {
        /// Token master contract.
        token: TokenAddress,
        /// Sending account, absent for mints.
        #[serde(default)]
        sender: Option<AccountAddress>,
        /// Receiving account, absent for burns.
        #[serde(default)]
        recipient: Option<AccountAddress>,
        /// Amount in the token's smallest unit.
        amount: String,
    },
    /// Transfer of a collectible, referenced by address only.
    CollectibleTransfer {
        /// Transferred item.
        collectible: CollectibleAddress,
        /// Previous owner, absent for mints.
        #[serde(default)]
        sender: Option<AccountAddress>,
        /// New owner, absent for burns.
        #[serde(default)]
        recipient: Option<AccountAddress>,
    },
    /// Marketplace purchase carrying the full collectible.
    CollectiblePurchase {
        /// Purchased item.
        collectible: Collectible,
        /// Buying account.
        buyer: AccountAddress,
        /// Selling account.
        seller: AccountAddress,
        /// Price in the smallest native unit.
        price: String,
    },
    /// Generic smart-contract invocation.
    ContractCall {
        /// Called contract.
        contract: AccountAddress,
        /// Operation name reported by the indexer.
        operation: String,
    },
    /// Token swap on a decentralized exchange.
    Swap {
        /// Exchange name.
        dex: String,
        /// Amount sold.
        amount_in: String,
        /// Amount bought.
        amount_out: String,
    },
    /// Any action the indexer reports that this engine does not model.
    Unknown,
}

/// One action of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Execution status.
    #[serde(default)]
    pub status: ActionStatus,
    /// Action payload.
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl Action {
    /// Creates a successful action.
    #[must_use]
    pub const fn ok(kind: ActionKind) -> Self {
        Self {
            status: ActionStatus::Ok,
            kind,
        }
    }

    /// Returns `true` for native-coin transfers.
    #[must_use]
    pub const fn is_native_transfer(&self) -> bool {
        matches!(self.kind, ActionKind::NativeTransfer { .. })
    }
}

/// A ledger event as reported by the indexing service.
///
/// Immutable once fetched and identified by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Indexer-assigned event identifier.
    pub id: String,
    /// When the event happened.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    /// Account whose history contains this event.
    pub account_address: AccountAddress,
    /// Flagged as likely spam or scam by the indexer.
    #[serde(default)]
    pub is_suspicious: bool,
    /// Not yet finalized on chain.
    #[serde(default)]
    pub is_pending: bool,
    /// Fee paid, in the smallest native unit.
    pub fee: String,
    /// Ordered actions of the event.
    pub actions: Vec<Action>,
}

impl Event {
    /// Keeps only the actions matching `keep`.
    ///
    /// Returns `None` when no action survives, so the whole event can be
    /// dropped by the caller.
    #[must_use]
    pub fn retain_actions(mut self, keep: impl Fn(&Action) -> bool) -> Option<Self> {
        self.actions.retain(|action| keep(action));
        if self.actions.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Addresses of collectibles referenced by transfer actions.
    pub fn collectible_references(&self) -> impl Iterator<Item = &CollectibleAddress> {
        self.actions.iter().filter_map(|action| match &action.kind {
            ActionKind::CollectibleTransfer { collectible, .. } => Some(collectible),
            _ => None,
        })
    }

    /// Collectibles carried inline by purchase actions.
    pub fn purchased_collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.actions.iter().filter_map(|action| match &action.kind {
            ActionKind::CollectiblePurchase { collectible, .. } => Some(collectible),
            _ => None,
        })
    }
}

/// One page of account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPage {
    /// Account the page belongs to.
    pub account_address: AccountAddress,
    /// Events, newest first.
    pub events: Vec<Event>,
    /// Cursor the page was requested with, if any.
    #[serde(default)]
    pub start_cursor: Option<i64>,
    /// Cursor for the next older page; [`END_OF_HISTORY`] when exhausted.
    pub next_cursor: i64,
}

impl EventPage {
    /// Creates an empty, exhausted page.
    #[must_use]
    pub const fn empty(account_address: AccountAddress) -> Self {
        Self {
            account_address,
            events: Vec::new(),
            start_cursor: None,
            next_cursor: END_OF_HISTORY,
        }
    }

    /// Returns `true` if the page holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if no older pages remain.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next_cursor == END_OF_HISTORY
    }

    /// Applies `filter` to every event, dropping those that map to `None`.
    #[must_use]
    pub fn filter_events(mut self, filter: impl Fn(Event) -> Option<Event>) -> Self {
        self.events = self.events.into_iter().filter_map(filter).collect();
        self
    }
}
