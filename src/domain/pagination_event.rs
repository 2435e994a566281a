//! Notifications emitted by the history paginator.
//!
//! [`PaginationEvent`] is the only contract toward the presentation layer.
//! Every event is broadcast through the [`super::EventBus`] and forwarded
//! to WebSocket subscribers.

use serde::Serialize;

use super::HistorySection;

/// One-way notification describing a change of the history feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "sections", rename_all = "snake_case")]
pub enum PaginationEvent {
    /// Sections built from the local cache, shown before the network answers.
    Cached(Vec<HistorySection>),
    /// No cache available; the first page is being fetched.
    Loading,
    /// The account has no history (or the first page could not be fetched).
    Empty,
    /// Sections rebuilt from the first network page.
    Loaded(Vec<HistorySection>),
    /// All sections after an older page was merged in.
    NextPage(Vec<HistorySection>),
    /// An older page is being fetched.
    PageLoading,
    /// Fetching an older page failed; previous sections are unchanged.
    PageLoadingFailed,
}

impl PaginationEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Cached(_) => "cached",
            Self::Loading => "loading",
            Self::Empty => "empty",
            Self::Loaded(_) => "loaded",
            Self::NextPage(_) => "next_page",
            Self::PageLoading => "page_loading",
            Self::PageLoadingFailed => "page_loading_failed",
        }
    }

    /// Returns the carried sections, if any.
    #[must_use]
    pub fn sections(&self) -> Option<&[HistorySection]> {
        match self {
            Self::Cached(sections) | Self::Loaded(sections) | Self::NextPage(sections) => {
                Some(sections)
            }
            Self::Loading | Self::Empty | Self::PageLoading | Self::PageLoadingFailed => None,
        }
    }
}
