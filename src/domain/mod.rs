//! Domain layer: history types, section bucketing, and the event system.
//!
//! This module contains the wallet-history domain model: typed addresses,
//! ledger events and pages, collectibles, date-bucketed sections, the
//! pagination notifications and the bus that broadcasts them.

pub mod address;
pub mod collectible;
pub mod event;
pub mod event_bus;
pub mod pagination_event;
pub mod section;

pub use address::{AccountAddress, CollectibleAddress, TokenAddress};
pub use collectible::{Collectible, CollectibleMetadata, Collectibles};
pub use event::{Action, ActionKind, ActionStatus, END_OF_HISTORY, Event, EventPage};
pub use event_bus::EventBus;
pub use pagination_event::PaginationEvent;
pub use section::{Bucket, HistorySection, ItemDateFormat, SectionList};
