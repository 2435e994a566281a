//! History controller: trigger wiring around the active paginator.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::HistoryPaginator;
use crate::collectible::CollectibleResolver;
use crate::config::HistoryConfig;
use crate::domain::{AccountAddress, Event, EventBus, PaginationEvent};
use crate::error::ActivityError;
use crate::indexer::HistoryService;
use crate::source::FeedScope;

/// External signal that the feed may need refreshing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A different account (or scope) became active.
    AccountActivated {
        /// Newly active account.
        account: AccountAddress,
        /// Slice of history to show.
        scope: FeedScope,
    },
    /// A transaction was just sent from this wallet.
    TransactionSent,
    /// A push notification reported new activity.
    BackgroundUpdate,
}

/// Owns the active [`HistoryPaginator`] and reacts to [`Trigger`]s.
///
/// Triggers are fire-and-forget: redundant or concurrent ones are absorbed
/// by the paginator's own loading guard. Background pushes are debounced
/// and reload only after the settle delay, giving the indexer time to
/// catch up with the chain.
#[derive(Debug)]
pub struct HistoryController {
    service: HistoryService,
    resolver: CollectibleResolver,
    event_bus: EventBus,
    config: HistoryConfig,
    push_settle_delay: Duration,
    active: RwLock<Option<Arc<HistoryPaginator>>>,
    pending_push: Mutex<Option<JoinHandle<()>>>,
}

impl HistoryController {
    /// Creates a controller with no active account.
    #[must_use]
    pub fn new(
        service: HistoryService,
        resolver: CollectibleResolver,
        event_bus: EventBus,
        config: HistoryConfig,
        push_settle_delay: Duration,
    ) -> Self {
        Self {
            service,
            resolver,
            event_bus,
            config,
            push_settle_delay,
            active: RwLock::new(None),
            pending_push: Mutex::new(None),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub const fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribes to the pagination event stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PaginationEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the currently active paginator.
    #[must_use]
    pub fn active(&self) -> Option<Arc<HistoryPaginator>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the currently active account.
    #[must_use]
    pub fn active_account(&self) -> Option<AccountAddress> {
        self.active().map(|paginator| paginator.account().clone())
    }

    /// Makes `account` active with a fresh paginator and retires the
    /// previous one. Does not start loading; see [`Self::activate`].
    pub fn switch_account(&self, account: AccountAddress, scope: &FeedScope) -> Arc<HistoryPaginator> {
        let paginator = Arc::new(HistoryPaginator::new(
            account,
            scope.source(self.service.clone()),
            self.resolver.clone(),
            self.event_bus.clone(),
            self.config,
        ));
        let previous = self
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Arc::clone(&paginator));
        if let Some(previous) = previous {
            previous.retire();
            tracing::debug!(account = %previous.account(), "retired paginator");
        }
        tracing::info!(account = %paginator.account(), ?scope, "account activated");
        paginator
    }

    /// Switches to `account` and starts its feed.
    pub async fn activate(&self, account: AccountAddress, scope: FeedScope) {
        self.switch_account(account, &scope).start().await;
    }

    /// Starts the active feed from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::NoActiveAccount`] before any activation.
    pub async fn start(&self) -> Result<(), ActivityError> {
        self.require_active()?.start().await;
        Ok(())
    }

    /// Reloads the active feed from the network.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::NoActiveAccount`] before any activation.
    pub async fn reload(&self) -> Result<(), ActivityError> {
        self.require_active()?.reload().await;
        Ok(())
    }

    /// Loads the next older page of the active feed.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::NoActiveAccount`] before any activation.
    pub async fn load_next(&self) -> Result<(), ActivityError> {
        self.require_active()?.load_next().await;
        Ok(())
    }

    /// Looks up one event of the active account through its event source.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::NoActiveAccount`] before any activation and
    /// propagates source failures.
    pub async fn load_event(&self, event_id: &str) -> Result<Event, ActivityError> {
        let paginator = self.require_active()?;
        paginator
            .source()
            .load_event(paginator.account(), event_id)
            .await
    }

    /// Reacts to a trigger without waiting for the resulting fetches.
    pub fn handle(self: &Arc<Self>, trigger: Trigger) {
        tracing::debug!(?trigger, "history trigger");
        match trigger {
            Trigger::AccountActivated { account, scope } => {
                let paginator = self.switch_account(account, &scope);
                tokio::spawn(async move { paginator.start().await });
            }
            Trigger::TransactionSent => {
                let controller = Arc::clone(self);
                tokio::spawn(async move { controller.reload_if_active().await });
            }
            Trigger::BackgroundUpdate => self.schedule_push_reload(),
        }
    }

    /// Spawns the trigger loop and returns its sender.
    ///
    /// The loop ends once every sender is dropped.
    pub fn spawn(self: Arc<Self>, capacity: usize) -> (mpsc::Sender<Trigger>, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some(trigger) = receiver.recv().await {
                self.handle(trigger);
            }
            tracing::debug!("trigger channel closed");
        });
        (sender, handle)
    }

    fn schedule_push_reload(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        let delay = self.push_settle_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.reload_if_active().await;
        });
        let mut pending = self
            .pending_push
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    async fn reload_if_active(&self) {
        if let Err(err) = self.reload().await {
            tracing::debug!(error = %err, "reload trigger ignored");
        }
    }

    fn require_active(&self) -> Result<Arc<HistoryPaginator>, ActivityError> {
        self.active().ok_or(ActivityError::NoActiveAccount)
    }
}

impl Drop for HistoryController {
    fn drop(&mut self) {
        let pending = self
            .pending_push
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
