//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Page size requested from the indexer.
pub const DEFAULT_PAGE_LIMIT: usize = 25;

/// Extra requests allowed when filtered pages come back empty.
pub const DEFAULT_MAX_SKIP_AHEAD: usize = 16;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Base URL of the remote indexing service.
    pub indexer_base_url: String,

    /// Optional bearer token for the indexing service.
    pub indexer_api_key: Option<String>,

    /// Per-request timeout for indexer calls, in milliseconds.
    pub indexer_timeout_ms: u64,

    /// Timeout for gateway HTTP requests, in milliseconds.
    pub request_timeout_ms: u64,

    /// Paginator behaviour.
    pub history: HistoryConfig,

    /// Delay before a background push triggers a reload, in milliseconds.
    pub push_settle_delay_ms: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Capacity of the controller's trigger queue.
    pub trigger_queue_capacity: usize,
}

/// Paginator tuning shared by every paginator the controller creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Events requested per page.
    pub page_limit: usize,
    /// Ceiling on chained requests when filtered pages come back empty.
    pub max_skip_ahead: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            max_skip_ahead: DEFAULT_MAX_SKIP_AHEAD,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let indexer_base_url = std::env::var("INDEXER_BASE_URL")
            .unwrap_or_else(|_| "https://tonapi.io".to_string())
            .trim_end_matches('/')
            .to_string();
        let indexer_api_key = std::env::var("INDEXER_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let indexer_timeout_ms = parse_env("INDEXER_TIMEOUT_MS", 10_000);
        let request_timeout_ms = parse_env("REQUEST_TIMEOUT_MS", 30_000);

        let history = HistoryConfig {
            page_limit: parse_env("HISTORY_PAGE_LIMIT", DEFAULT_PAGE_LIMIT).max(1),
            max_skip_ahead: parse_env("HISTORY_MAX_SKIP_AHEAD", DEFAULT_MAX_SKIP_AHEAD),
        };

        let push_settle_delay_ms = parse_env("PUSH_SETTLE_DELAY_MS", 2_000);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1_024);
        let trigger_queue_capacity = parse_env("TRIGGER_QUEUE_CAPACITY", 64);

        Ok(Self {
            listen_addr,
            indexer_base_url,
            indexer_api_key,
            indexer_timeout_ms,
            request_timeout_ms,
            history,
            push_settle_delay_ms,
            event_bus_capacity,
            trigger_queue_capacity,
        })
    }

    /// Indexer request timeout as a [`Duration`].
    #[must_use]
    pub const fn indexer_timeout(&self) -> Duration {
        Duration::from_millis(self.indexer_timeout_ms)
    }

    /// Gateway request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Background push settle delay as a [`Duration`].
    #[must_use]
    pub const fn push_settle_delay(&self) -> Duration {
        Duration::from_millis(self.push_settle_delay_ms)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
