//! History paginator: the cache → network state machine behind the feed.
//!
//! One [`HistoryPaginator`] serves one account and one event source. It
//! owns the pagination cursor and the ordered sections, paints the cached
//! first page before the network answers, replaces it with the live page,
//! reads one page ahead, and pages further back on demand.
//!
//! # Concurrency
//!
//! All state lives behind a single `tokio::sync::Mutex` that is never held
//! across a network call. The `Loading` flag is checked and set under that
//! lock, so at most one fetch is in flight and `load_next` calls arriving
//! meanwhile are dropped. `start`/`reload` always proceed: they bump a
//! generation counter, and results of fetches issued under an older
//! generation are discarded without emitting anything.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::collectible::CollectibleResolver;
use crate::config::HistoryConfig;
use crate::domain::{
    AccountAddress, Collectibles, END_OF_HISTORY, EventBus, EventPage, HistorySection,
    PaginationEvent, SectionList,
};
use crate::error::ActivityError;
use crate::source::EventSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Idle,
    Loading,
}

#[derive(Debug)]
struct PaginatorState {
    load_state: LoadState,
    cursor: Option<i64>,
    sections: SectionList,
    generation: u64,
    /// Reference time for bucketing, fixed per generation.
    now: DateTime<Utc>,
}

/// Concurrency-guarded pagination state machine for one account.
#[derive(Debug)]
pub struct HistoryPaginator {
    account: AccountAddress,
    source: Arc<dyn EventSource>,
    resolver: CollectibleResolver,
    event_bus: EventBus,
    config: HistoryConfig,
    clock: fn() -> DateTime<Utc>,
    retired: AtomicBool,
    state: Mutex<PaginatorState>,
}

impl HistoryPaginator {
    /// Creates an idle paginator positioned at the start of history.
    #[must_use]
    pub fn new(
        account: AccountAddress,
        source: Arc<dyn EventSource>,
        resolver: CollectibleResolver,
        event_bus: EventBus,
        config: HistoryConfig,
    ) -> Self {
        Self {
            account,
            source,
            resolver,
            event_bus,
            config,
            clock: Utc::now,
            retired: AtomicBool::new(false),
            state: Mutex::new(PaginatorState {
                load_state: LoadState::Idle,
                cursor: None,
                sections: SectionList::new(),
                generation: 0,
                now: Utc::now(),
            }),
        }
    }

    /// Replaces the clock used to bucket events into sections.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self.state.get_mut().now = clock();
        self
    }

    /// Returns the account this paginator serves.
    #[must_use]
    pub const fn account(&self) -> &AccountAddress {
        &self.account
    }

    /// Returns the event source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn EventSource> {
        &self.source
    }

    /// Returns the current cursor (`None` before the first page).
    pub async fn cursor(&self) -> Option<i64> {
        self.state.lock().await.cursor
    }

    /// Returns a copy of the current sections.
    pub async fn sections(&self) -> Vec<HistorySection> {
        self.state.lock().await.sections.snapshot()
    }

    /// Returns `true` while a fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.load_state == LoadState::Loading
    }

    /// Paints the cached first page, then loads the live one and reads ahead.
    pub async fn start(&self) {
        self.reset_and_load(true).await;
    }

    /// Like [`Self::start`] without consulting the cache.
    pub async fn reload(&self) {
        self.reset_and_load(false).await;
    }

    /// Loads the next older page, unless a fetch is in flight or history
    /// is exhausted.
    pub async fn load_next(&self) {
        let (generation, cursor) = {
            let mut state = self.state.lock().await;
            if self.is_retired() || state.load_state == LoadState::Loading {
                return;
            }
            if state.cursor == Some(END_OF_HISTORY) {
                return;
            }
            state.load_state = LoadState::Loading;
            self.emit(PaginationEvent::PageLoading);
            (state.generation, state.cursor)
        };

        let result = self.fetch_resolved(cursor).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(account = %self.account, "discarding superseded page");
            return;
        }
        match result {
            Ok((page, collectibles)) => {
                tracing::debug!(
                    account = %self.account,
                    events = page.events.len(),
                    next_cursor = page.next_cursor,
                    "next page loaded"
                );
                state.cursor = Some(page.next_cursor);
                let now = state.now;
                state.sections.merge(page.events, &collectibles, now);
                self.emit(PaginationEvent::NextPage(state.sections.snapshot()));
            }
            Err(err) => {
                tracing::warn!(account = %self.account, ?cursor, error = %err, "next page failed");
                self.emit(PaginationEvent::PageLoadingFailed);
            }
        }
        state.load_state = LoadState::Idle;
    }

    /// Detaches the paginator: no further events are emitted and new
    /// commands are ignored. Takes effect immediately, even for a fetch
    /// already in flight.
    pub fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`Self::retire`] was called.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }

    async fn reset_and_load(&self, use_cache: bool) {
        let generation = {
            let mut state = self.state.lock().await;
            if self.is_retired() {
                return;
            }
            state.generation = state.generation.wrapping_add(1);
            state.now = (self.clock)();
            state.load_state = LoadState::Loading;
            state.cursor = None;
            state.sections.clear();
            if use_cache {
                self.paint_cache(&mut state);
            }
            state.generation
        };
        tracing::info!(account = %self.account, use_cache, "loading history");

        let result = self.fetch_resolved(None).await;

        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                tracing::debug!(account = %self.account, "discarding superseded first page");
                return;
            }
            state.sections.clear();
            match result {
                Ok((page, collectibles)) => {
                    state.cursor = Some(page.next_cursor);
                    if page.is_empty() {
                        self.emit(PaginationEvent::Empty);
                    } else {
                        let now = state.now;
                        state.sections.merge(page.events, &collectibles, now);
                        self.emit(PaginationEvent::Loaded(state.sections.snapshot()));
                    }
                }
                Err(err) => {
                    tracing::warn!(account = %self.account, error = %err, "first page failed");
                    self.emit(PaginationEvent::Empty);
                }
            }
            state.load_state = LoadState::Idle;
        }

        self.load_next().await;
    }

    fn paint_cache(&self, state: &mut PaginatorState) {
        match self.source.cached_events(&self.account) {
            Ok(page) if !page.is_empty() => {
                let collectibles = self.resolver.resolve_cached(&page.events);
                let now = state.now;
                state.sections.merge(page.events, &collectibles, now);
                self.emit(PaginationEvent::Cached(state.sections.snapshot()));
            }
            Ok(_) => self.emit(PaginationEvent::Loading),
            Err(err) => {
                tracing::debug!(account = %self.account, error = %err, "no cached history");
                self.emit(PaginationEvent::Loading);
            }
        }
    }

    async fn fetch_resolved(
        &self,
        cursor: Option<i64>,
    ) -> Result<(EventPage, Collectibles), ActivityError> {
        let page = self.fetch_page(cursor).await?;
        let collectibles = self.resolver.resolve_loaded(&page.events).await;
        Ok((page, collectibles))
    }

    /// Fetches the page before `cursor`, skipping ahead over pages that a
    /// filtering source emptied while older history remains.
    async fn fetch_page(&self, cursor: Option<i64>) -> Result<EventPage, ActivityError> {
        let limit = self.config.page_limit;
        let mut page = self.source.load_events(&self.account, cursor, limit).await?;
        let mut skipped = 0;
        while page.is_empty() && !page.is_last() {
            if skipped >= self.config.max_skip_ahead {
                tracing::warn!(
                    account = %self.account,
                    skipped,
                    next_cursor = page.next_cursor,
                    "skip-ahead ceiling reached"
                );
                break;
            }
            skipped += 1;
            page = self
                .source
                .load_events(&self.account, Some(page.next_cursor), limit)
                .await?;
        }
        Ok(page)
    }

    fn emit(&self, event: PaginationEvent) {
        if self.is_retired() {
            return;
        }
        let _ = self.event_bus.publish(event);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::collectible::{CollectibleStore, MemoryCollectibleStore};
    use crate::domain::{Collectible, CollectibleAddress};
    use crate::indexer::IndexerApi;
    use crate::test_support::{
        FakeIndexer, FakeSource, account, native_event, numbered_events, page, transfer_event,
    };
    use tokio::sync::broadcast;

    fn resolver(indexer: &Arc<FakeIndexer>) -> CollectibleResolver {
        CollectibleResolver::new(
            Arc::new(MemoryCollectibleStore::new()) as Arc<dyn CollectibleStore>,
            Arc::clone(indexer) as Arc<dyn IndexerApi>,
        )
    }

    fn paginator_with(source: &Arc<FakeSource>, config: HistoryConfig) -> (Arc<HistoryPaginator>, EventBus) {
        let bus = EventBus::new(256);
        let paginator = HistoryPaginator::new(
            account(),
            Arc::clone(source) as Arc<dyn EventSource>,
            resolver(&Arc::new(FakeIndexer::new())),
            bus.clone(),
            config,
        );
        (Arc::new(paginator), bus)
    }

    fn paginator(source: &Arc<FakeSource>) -> (Arc<HistoryPaginator>, EventBus) {
        paginator_with(source, HistoryConfig::default())
    }

    fn drain(rx: &mut broadcast::Receiver<PaginationEvent>) -> Vec<PaginationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn kinds(events: &[PaginationEvent]) -> Vec<&'static str> {
        events.iter().map(PaginationEvent::event_type_str).collect()
    }

    fn event_ids(sections: &[HistorySection]) -> Vec<String> {
        sections
            .iter()
            .flat_map(|section| section.events.iter().map(|event| event.id.clone()))
            .collect()
    }

    fn assert_sorted(sections: &[HistorySection]) {
        for pair in sections.windows(2) {
            let [newer, older] = pair else {
                panic!("windows(2) yields pairs");
            };
            assert!(newer.bucket_date > older.bucket_date);
        }
        for section in sections {
            for pair in section.events.windows(2) {
                let [newer, older] = pair else {
                    panic!("windows(2) yields pairs");
                };
                assert!(newer.timestamp >= older.timestamp);
            }
        }
    }

    #[tokio::test]
    async fn end_to_end_thirty_events_with_read_ahead() {
        let source = Arc::new(FakeSource::new());
        source.push_page(Ok(page(numbered_events(1..=25), 500)));
        source.push_page(Ok(page(numbered_events(26..=30), END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        paginator.start().await;

        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["loading", "loaded", "page_loading", "next_page"]);
        let Some(PaginationEvent::Loaded(first)) = events.get(1) else {
            panic!("loaded expected");
        };
        assert_eq!(event_ids(first).len(), 25);
        let Some(PaginationEvent::NextPage(all)) = events.get(3) else {
            panic!("next page expected");
        };
        let expected: Vec<String> = (1..=30).map(|n| format!("e{n}")).collect();
        assert_eq!(event_ids(all), expected);
        assert_eq!(paginator.cursor().await, Some(END_OF_HISTORY));
        assert_eq!(source.limits(), vec![25, 25]);

        paginator.load_next().await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(source.calls(), vec![None, Some(500)]);
    }

    #[tokio::test]
    async fn cache_is_painted_before_network() {
        let cached = page(vec![native_event("cached", 100)], 50);
        let source = Arc::new(FakeSource::gated().with_cache(cached));
        source.push_page(Ok(page(vec![native_event("live", 200)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        let task = tokio::spawn({
            let paginator = Arc::clone(&paginator);
            async move { paginator.start().await }
        });
        source.wait_for_calls(1).await;

        let before_network = drain(&mut rx);
        let Some(PaginationEvent::Cached(sections)) = before_network.first() else {
            panic!("cached expected first, got {before_network:?}");
        };
        assert_eq!(event_ids(sections), vec!["cached".to_string()]);
        assert_eq!(before_network.len(), 1);

        source.release(1);
        let _ = task.await;

        let after = drain(&mut rx);
        let Some(PaginationEvent::Loaded(sections)) = after.first() else {
            panic!("loaded expected, got {after:?}");
        };
        // Cache-derived sections are discarded, not merged.
        assert_eq!(event_ids(sections), vec!["live".to_string()]);
    }

    #[tokio::test]
    async fn reload_skips_cache() {
        let cached = page(vec![native_event("cached", 100)], 50);
        let source = Arc::new(FakeSource::new().with_cache(cached));
        source.push_page(Ok(page(vec![native_event("live", 200)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        paginator.reload().await;

        assert_eq!(kinds(&drain(&mut rx)), vec!["loaded"]);
    }

    #[tokio::test]
    async fn empty_history_emits_empty() {
        let source = Arc::new(FakeSource::new());
        source.push_page(Ok(page(Vec::new(), END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        paginator.start().await;

        assert_eq!(kinds(&drain(&mut rx)), vec!["loading", "empty"]);
        assert_eq!(source.calls(), vec![None]);
    }

    #[tokio::test]
    async fn first_page_failure_collapses_into_empty() {
        let source = Arc::new(FakeSource::new());
        source.push_page(Err("offline".to_string()));
        source.push_page(Ok(page(vec![native_event("late", 100)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        paginator.start().await;

        // Without a cursor the read-ahead retries the first page.
        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["loading", "empty", "page_loading", "next_page"]);
        assert_eq!(source.calls(), vec![None, None]);
    }

    #[tokio::test]
    async fn load_next_is_single_flight() {
        let source = Arc::new(FakeSource::gated());
        source.push_page(Ok(page(vec![native_event("e1", 100)], 40)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        let first = tokio::spawn({
            let paginator = Arc::clone(&paginator);
            async move { paginator.load_next().await }
        });
        source.wait_for_calls(1).await;
        assert!(paginator.is_loading().await);

        paginator.load_next().await;
        paginator.load_next().await;
        assert_eq!(source.calls().len(), 1);

        source.release(1);
        let _ = first.await;

        assert_eq!(source.calls().len(), 1);
        assert_eq!(kinds(&drain(&mut rx)), vec!["page_loading", "next_page"]);
        assert!(!paginator.is_loading().await);
    }

    #[tokio::test]
    async fn exhausted_cursor_makes_load_next_a_no_op() {
        let source = Arc::new(FakeSource::new());
        source.push_page(Ok(page(vec![native_event("e1", 100)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);

        paginator.load_next().await;
        let mut rx = bus.subscribe();
        paginator.load_next().await;
        paginator.load_next().await;

        assert!(drain(&mut rx).is_empty());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn skip_ahead_over_filtered_pages() {
        let source = Arc::new(FakeSource::new());
        source.push_page(Ok(page(Vec::new(), 5)));
        source.push_page(Ok(page(vec![native_event("e1", 100)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        paginator.load_next().await;

        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["page_loading", "next_page"]);
        let Some(PaginationEvent::NextPage(sections)) = events.get(1) else {
            panic!("next page expected");
        };
        assert_eq!(sections.len(), 1);
        assert_eq!(event_ids(sections), vec!["e1".to_string()]);
        assert_eq!(source.calls(), vec![None, Some(5)]);
    }

    #[tokio::test]
    async fn skip_ahead_is_bounded() {
        let source = Arc::new(FakeSource::new());
        for cursor in (1..=10).rev() {
            source.push_page(Ok(page(Vec::new(), cursor)));
        }
        let config = HistoryConfig {
            page_limit: 25,
            max_skip_ahead: 2,
        };
        let (paginator, bus) = paginator_with(&source, config);
        let mut rx = bus.subscribe();

        paginator.load_next().await;

        assert_eq!(source.calls(), vec![None, Some(10), Some(9)]);
        assert_eq!(kinds(&drain(&mut rx)), vec!["page_loading", "next_page"]);
        // Not exhausted: the next call resumes where skipping stopped.
        assert_eq!(paginator.cursor().await, Some(8));
    }

    #[tokio::test]
    async fn failed_page_preserves_state_for_retry() {
        let source = Arc::new(FakeSource::new());
        source.push_page(Ok(page(numbered_events(1..=3), 70)));
        source.push_page(Err("timeout".to_string()));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        paginator.start().await;
        let events = drain(&mut rx);
        assert_eq!(
            kinds(&events),
            vec!["loading", "loaded", "page_loading", "page_loading_failed"]
        );
        let Some(PaginationEvent::Loaded(loaded)) = events.get(1) else {
            panic!("loaded expected");
        };
        assert_eq!(paginator.cursor().await, Some(70));
        assert_eq!(&paginator.sections().await, loaded);

        source.push_page(Ok(page(numbered_events(4..=5), END_OF_HISTORY)));
        paginator.load_next().await;

        assert_eq!(source.calls(), vec![None, Some(70), Some(70)]);
        let events = drain(&mut rx);
        let Some(PaginationEvent::NextPage(sections)) = events.last() else {
            panic!("next page expected");
        };
        assert_eq!(event_ids(sections).len(), 5);
    }

    #[tokio::test]
    async fn sections_stay_sorted_across_merges() {
        let source = Arc::new(FakeSource::new());
        let day = 86_400;
        source.push_page(Ok(page(
            vec![native_event("b", 40 * day), native_event("a", 90 * day)],
            30,
        )));
        source.push_page(Ok(page(
            vec![native_event("c", 60 * day), native_event("d", 2 * day)],
            20,
        )));
        source.push_page(Ok(page(vec![native_event("e", 95 * day)], END_OF_HISTORY)));
        let (paginator, _bus) = paginator(&source);

        paginator.start().await;
        paginator.load_next().await;

        let sections = paginator.sections().await;
        assert_sorted(&sections);
        assert_eq!(event_ids(&sections), vec!["e", "a", "c", "b", "d"]);
    }

    #[tokio::test]
    async fn reload_supersedes_in_flight_page() {
        let source = Arc::new(FakeSource::gated());
        source.push_page(Ok(page(vec![native_event("stale", 100)], 40)));
        source.push_page(Ok(page(vec![native_event("fresh", 200)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        let stale = tokio::spawn({
            let paginator = Arc::clone(&paginator);
            async move { paginator.load_next().await }
        });
        source.wait_for_calls(1).await;
        let fresh = tokio::spawn({
            let paginator = Arc::clone(&paginator);
            async move { paginator.reload().await }
        });
        source.wait_for_calls(2).await;

        source.release(1);
        let _ = stale.await;
        source.release(1);
        let _ = fresh.await;

        let events = drain(&mut rx);
        assert_eq!(kinds(&events), vec!["page_loading", "loaded"]);
        assert_eq!(event_ids(&paginator.sections().await), vec!["fresh".to_string()]);
        assert_eq!(paginator.cursor().await, Some(END_OF_HISTORY));
        assert!(!paginator.is_loading().await);
    }

    #[tokio::test]
    async fn retired_paginator_stays_silent() {
        let source = Arc::new(FakeSource::gated());
        source.push_page(Ok(page(vec![native_event("e1", 100)], END_OF_HISTORY)));
        let (paginator, bus) = paginator(&source);
        let mut rx = bus.subscribe();

        let task = tokio::spawn({
            let paginator = Arc::clone(&paginator);
            async move { paginator.start().await }
        });
        source.wait_for_calls(1).await;
        paginator.retire();
        assert!(paginator.is_retired());
        source.release(1);
        let _ = task.await;

        paginator.start().await;
        paginator.load_next().await;

        assert_eq!(kinds(&drain(&mut rx)), vec!["loading"]);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn loaded_sections_carry_resolved_collectibles() {
        let indexer = Arc::new(FakeIndexer::new());
        let nft = Collectible::new(CollectibleAddress::new("0:nft")).with_name("Punk");
        indexer.add_collectible(nft.clone());
        let source = Arc::new(FakeSource::new());
        source.push_page(Ok(page(vec![transfer_event("t1", 100, "0:nft")], END_OF_HISTORY)));
        let bus = EventBus::new(64);
        let paginator = HistoryPaginator::new(
            account(),
            Arc::clone(&source) as Arc<dyn EventSource>,
            resolver(&indexer),
            bus.clone(),
            HistoryConfig::default(),
        );
        let mut rx = bus.subscribe();

        paginator.start().await;

        let events = drain(&mut rx);
        let Some(PaginationEvent::Loaded(sections)) = events.get(1) else {
            panic!("loaded expected, got {events:?}");
        };
        let Some(section) = sections.first() else {
            panic!("one section");
        };
        assert_eq!(section.collectibles.get(&nft.address), Some(&nft));
    }

    static CLOCK_SECS: std::sync::atomic::AtomicI64 = std::sync::atomic::AtomicI64::new(0);

    fn settable_clock() -> DateTime<Utc> {
        DateTime::from_timestamp(CLOCK_SECS.load(Ordering::SeqCst), 0).unwrap_or_default()
    }

    fn utc_secs(month: u32, day: u32) -> i64 {
        let Some(date) = chrono::NaiveDate::from_ymd_opt(2026, month, day)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
        else {
            panic!("valid date");
        };
        date.and_utc().timestamp()
    }

    #[tokio::test]
    async fn bucketing_reference_is_fixed_per_generation() {
        CLOCK_SECS.store(utc_secs(10, 19), Ordering::SeqCst);
        let source = Arc::new(FakeSource::gated());
        source.push_page(Ok(page(
            vec![
                native_event("oct5", utc_secs(10, 5)),
                native_event("oct1", utc_secs(10, 1)),
            ],
            40,
        )));
        source.push_page(Ok(page(vec![native_event("oct10", utc_secs(10, 10))], END_OF_HISTORY)));
        let paginator = Arc::new(
            HistoryPaginator::new(
                account(),
                Arc::clone(&source) as Arc<dyn EventSource>,
                resolver(&Arc::new(FakeIndexer::new())),
                EventBus::new(256),
                HistoryConfig::default(),
            )
            .with_clock(settable_clock),
        );

        let task = tokio::spawn({
            let paginator = Arc::clone(&paginator);
            async move { paginator.start().await }
        });
        source.release(1);
        source.wait_for_calls(2).await;
        // The date moves on while the read-ahead page is in flight.
        CLOCK_SECS.store(utc_secs(11, 2), Ordering::SeqCst);
        source.release(1);
        tokio_test::assert_ok!(task.await);

        let titles: Vec<String> = paginator
            .sections()
            .await
            .into_iter()
            .map(|section| section.title)
            .collect();
        assert_eq!(titles, vec!["10 October", "5 October", "1 October"]);

        source.push_page(Ok(page(
            vec![
                native_event("oct10", utc_secs(10, 10)),
                native_event("oct5", utc_secs(10, 5)),
            ],
            END_OF_HISTORY,
        )));
        source.release(1);
        paginator.reload().await;
        let titles: Vec<String> = paginator
            .sections()
            .await
            .into_iter()
            .map(|section| section.title)
            .collect();
        assert_eq!(titles, vec!["October"]);
    }
}
