//! History DTOs for activation and event lookup.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountAddress, Event};
use crate::error::ActivityError;
use crate::source::FeedScope;

/// Request body for `POST /history/activate`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ActivateRequest {
    /// Raw account address.
    pub account: String,
    /// `"all"` (default), `"native"` or `{"token": "<address>"}`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub scope: FeedScope,
}

impl ActivateRequest {
    /// Validates the account address.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidRequest`] for a blank account.
    pub fn account(&self) -> Result<AccountAddress, ActivityError> {
        let account = self.account.trim();
        if account.is_empty() {
            return Err(ActivityError::InvalidRequest(
                "account must not be empty".to_string(),
            ));
        }
        Ok(AccountAddress::new(account))
    }
}

/// Response body for `GET /history/events/{event_id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    /// The event as seen through the active feed's source.
    #[schema(value_type = Object)]
    pub event: Event,
}
