//! activity-gateway server entry point.
//!
//! Wires the indexer client, cache, collectible store and history
//! controller, then serves the REST and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use activity_gateway::api;
use activity_gateway::app_state::AppState;
use activity_gateway::collectible::{CollectibleResolver, CollectibleStore, MemoryCollectibleStore};
use activity_gateway::config::GatewayConfig;
use activity_gateway::domain::EventBus;
use activity_gateway::indexer::{EventCache, HistoryService, HttpIndexerClient, IndexerApi};
use activity_gateway::service::HistoryController;
use activity_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        indexer = %config.indexer_base_url,
        page_limit = config.history.page_limit,
        "starting activity-gateway"
    );

    // Build indexer layer
    let api: Arc<dyn IndexerApi> = Arc::new(HttpIndexerClient::new(
        config.indexer_base_url.clone(),
        config.indexer_api_key.clone(),
        config.indexer_timeout(),
    )?);
    let service = HistoryService::new(Arc::clone(&api), Arc::new(EventCache::new()));
    let store: Arc<dyn CollectibleStore> = Arc::new(MemoryCollectibleStore::new());
    let resolver = CollectibleResolver::new(store, api);

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let controller = Arc::new(HistoryController::new(
        service,
        resolver,
        event_bus,
        config.history,
        config.push_settle_delay(),
    ));

    // Build application state
    let app_state = AppState::spawn(controller, config.trigger_queue_capacity);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
