//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement for fire-and-forget commands (202 Accepted).
///
/// Results arrive as pagination events on `/ws`, not in this body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AcceptedResponse {
    /// Command that was accepted (e.g. `"reload"`).
    pub command: String,
    /// Account the command applies to, when one is active.
    pub account: Option<String>,
}

impl AcceptedResponse {
    /// Builds an acknowledgement for `command`.
    #[must_use]
    pub fn new(command: &str, account: Option<String>) -> Self {
        Self {
            command: command.to_string(),
            account,
        }
    }
}
