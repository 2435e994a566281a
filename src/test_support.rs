//! In-memory fakes and fixtures shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use crate::collectible::{CollectibleResolver, CollectibleStore, MemoryCollectibleStore};
use crate::config::HistoryConfig;
use crate::domain::{
    AccountAddress, Action, ActionKind, Collectible, CollectibleAddress, Event, EventBus,
    EventPage, TokenAddress,
};
use crate::error::ActivityError;
use crate::indexer::{EventCache, HistoryService, IndexerApi};
use crate::service::HistoryController;
use crate::source::EventSource;

pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn account() -> AccountAddress {
    AccountAddress::new("0:me")
}

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

pub fn native_action(amount: &str) -> Action {
    Action::ok(ActionKind::NativeTransfer {
        sender: AccountAddress::new("0:me"),
        recipient: AccountAddress::new("0:you"),
        amount: amount.to_string(),
        comment: None,
    })
}

pub fn event_with(id: &str, secs: i64, actions: Vec<Action>) -> Event {
    Event {
        id: id.to_string(),
        timestamp: at(secs),
        account_address: account(),
        is_suspicious: false,
        is_pending: false,
        fee: "0".to_string(),
        actions,
    }
}

pub fn native_event(id: &str, secs: i64) -> Event {
    event_with(id, secs, vec![native_action("1")])
}

pub fn transfer_event(id: &str, secs: i64, collectible: &str) -> Event {
    event_with(
        id,
        secs,
        vec![Action::ok(ActionKind::CollectibleTransfer {
            collectible: CollectibleAddress::new(collectible),
            sender: None,
            recipient: Some(account()),
        })],
    )
}

pub fn purchase_event(id: &str, secs: i64, collectible: &str) -> Event {
    event_with(
        id,
        secs,
        vec![Action::ok(ActionKind::CollectiblePurchase {
            collectible: Collectible::new(CollectibleAddress::new(collectible)),
            buyer: account(),
            seller: AccountAddress::new("0:shop"),
            price: "10".to_string(),
        })],
    )
}

pub fn page(events: Vec<Event>, next_cursor: i64) -> EventPage {
    EventPage {
        account_address: account(),
        events,
        start_cursor: None,
        next_cursor,
    }
}

/// Native events `e{n}` for every `n` in `range`, newest first, one minute apart.
pub fn numbered_events(range: std::ops::RangeInclusive<usize>) -> Vec<Event> {
    range
        .map(|n| {
            let secs = 1_000_000_i64 - i64::try_from(n).unwrap_or_default() * 60;
            native_event(&format!("e{n}"), secs)
        })
        .collect()
}

/// Scripted [`IndexerApi`].
#[derive(Debug, Default)]
pub struct FakeIndexer {
    pages: Mutex<VecDeque<Result<EventPage, String>>>,
    cursors: Mutex<Vec<Option<i64>>>,
    token_calls: AtomicUsize,
    events: Mutex<HashMap<String, Event>>,
    collectibles: Mutex<HashMap<CollectibleAddress, Collectible>>,
    collectible_calls: AtomicUsize,
    last_batch: Mutex<Vec<CollectibleAddress>>,
    fail_collectibles: AtomicBool,
}

impl FakeIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: Result<EventPage, String>) {
        lock(&self.pages).push_back(page);
    }

    pub fn add_event(&self, event: Event) {
        lock(&self.events).insert(event.id.clone(), event);
    }

    pub fn add_collectible(&self, collectible: Collectible) {
        lock(&self.collectibles).insert(collectible.address.clone(), collectible);
    }

    pub fn fail_collectibles(&self) {
        self.fail_collectibles.store(true, Ordering::SeqCst);
    }

    pub fn cursors(&self) -> Vec<Option<i64>> {
        lock(&self.cursors).clone()
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn collectible_calls(&self) -> usize {
        self.collectible_calls.load(Ordering::SeqCst)
    }

    pub fn last_collectible_batch(&self) -> Vec<CollectibleAddress> {
        lock(&self.last_batch).clone()
    }

    fn next_page(&self, before_cursor: Option<i64>) -> Result<EventPage, ActivityError> {
        lock(&self.cursors).push(before_cursor);
        let scripted = lock(&self.pages).pop_front();
        match scripted {
            Some(Ok(mut page)) => {
                page.start_cursor = before_cursor;
                Ok(page)
            }
            Some(Err(message)) => Err(ActivityError::IndexerTransport(message)),
            None => Ok(EventPage::empty(account())),
        }
    }
}

#[async_trait]
impl IndexerApi for FakeIndexer {
    async fn account_events(
        &self,
        _account: &AccountAddress,
        before_cursor: Option<i64>,
        _limit: usize,
    ) -> Result<EventPage, ActivityError> {
        self.next_page(before_cursor)
    }

    async fn token_events(
        &self,
        _account: &AccountAddress,
        _token: &TokenAddress,
        before_cursor: Option<i64>,
        _limit: usize,
    ) -> Result<EventPage, ActivityError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.next_page(before_cursor)
    }

    async fn account_event(
        &self,
        _account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        lock(&self.events)
            .get(event_id)
            .cloned()
            .ok_or_else(|| ActivityError::EventNotFound(event_id.to_string()))
    }

    async fn collectibles(
        &self,
        addresses: &[CollectibleAddress],
    ) -> Result<Vec<Collectible>, ActivityError> {
        self.collectible_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_batch) = addresses.to_vec();
        if self.fail_collectibles.load(Ordering::SeqCst) {
            return Err(ActivityError::IndexerTransport("offline".to_string()));
        }
        let known = lock(&self.collectibles);
        Ok(addresses
            .iter()
            .filter_map(|address| known.get(address).cloned())
            .collect())
    }
}

/// Scripted [`EventSource`] whose network answers can be held back.
#[derive(Debug)]
pub struct FakeSource {
    cached: Mutex<Option<EventPage>>,
    pages: Mutex<VecDeque<Result<EventPage, String>>>,
    calls: Mutex<Vec<Option<i64>>>,
    limits: Mutex<Vec<usize>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
    /// Source answering immediately.
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
            pages: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            limits: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Source whose network answers wait for [`FakeSource::release`].
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new()
        }
    }

    pub fn with_cache(self, page: EventPage) -> Self {
        *lock(&self.cached) = Some(page);
        self
    }

    pub fn push_page(&self, page: Result<EventPage, String>) {
        lock(&self.pages).push_back(page);
    }

    /// Lets `count` held network answers through.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    pub fn calls(&self) -> Vec<Option<i64>> {
        lock(&self.calls).clone()
    }

    pub fn limits(&self) -> Vec<usize> {
        lock(&self.limits).clone()
    }

    /// Waits until at least `count` network calls have been made.
    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..500 {
            if lock(&self.calls).len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

#[async_trait]
impl EventSource for FakeSource {
    fn cached_events(&self, account: &AccountAddress) -> Result<EventPage, ActivityError> {
        lock(&self.cached)
            .clone()
            .ok_or_else(|| ActivityError::CacheMiss(account.to_string()))
    }

    async fn load_events(
        &self,
        _account: &AccountAddress,
        before_cursor: Option<i64>,
        limit: usize,
    ) -> Result<EventPage, ActivityError> {
        lock(&self.calls).push(before_cursor);
        lock(&self.limits).push(limit);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        let scripted = lock(&self.pages).pop_front();
        match scripted {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(ActivityError::IndexerTransport(message)),
            None => Ok(EventPage::empty(account())),
        }
    }

    async fn load_event(
        &self,
        _account: &AccountAddress,
        event_id: &str,
    ) -> Result<Event, ActivityError> {
        Err(ActivityError::EventNotFound(event_id.to_string()))
    }
}

/// Controller over a [`FakeIndexer`] with an empty cache and store.
pub fn controller(indexer: &Arc<FakeIndexer>, settle: Duration) -> Arc<HistoryController> {
    let api = Arc::clone(indexer) as Arc<dyn IndexerApi>;
    let service = HistoryService::new(Arc::clone(&api), Arc::new(EventCache::new()));
    let resolver = CollectibleResolver::new(
        Arc::new(MemoryCollectibleStore::new()) as Arc<dyn CollectibleStore>,
        api,
    );
    Arc::new(HistoryController::new(
        service,
        resolver,
        EventBus::new(256),
        HistoryConfig::default(),
        settle,
    ))
}
