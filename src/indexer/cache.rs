//! Local, synchronous cache of the newest history page per account.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{AccountAddress, EventPage, TokenAddress};
use crate::error::ActivityError;

/// Which slice of an account's history a cached page belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryScope {
    /// Every event of the account.
    All,
    /// Events touching one fungible token.
    Token(TokenAddress),
}

/// In-memory store of the first history page per `(account, scope)`.
///
/// Reads never touch the network. A missing entry is reported as
/// [`ActivityError::CacheMiss`], which callers treat as "no cache".
#[derive(Debug, Default)]
pub struct EventCache {
    pages: RwLock<HashMap<(AccountAddress, HistoryScope), EventPage>>,
}

impl EventCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached page for `account` and `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::CacheMiss`] if nothing is cached and
    /// [`ActivityError::Store`] if the lock is poisoned.
    pub fn get(
        &self,
        account: &AccountAddress,
        scope: &HistoryScope,
    ) -> Result<EventPage, ActivityError> {
        let pages = self
            .pages
            .read()
            .map_err(|_| ActivityError::Store("event cache lock poisoned".to_string()))?;
        pages
            .get(&(account.clone(), scope.clone()))
            .cloned()
            .ok_or_else(|| ActivityError::CacheMiss(account.to_string()))
    }

    /// Replaces the cached page for `account` and `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Store`] if the lock is poisoned.
    pub fn put(
        &self,
        account: &AccountAddress,
        scope: HistoryScope,
        page: EventPage,
    ) -> Result<(), ActivityError> {
        let mut pages = self
            .pages
            .write()
            .map_err(|_| ActivityError::Store("event cache lock poisoned".to_string()))?;
        pages.insert((account.clone(), scope), page);
        Ok(())
    }

    /// Returns the number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.read().map(|pages| pages.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
