//! History handlers: activation, paging commands, triggers, event lookup.
//!
//! Commands are fire-and-forget. Each returns `202 Accepted` once queued;
//! the resulting sections arrive as pagination events on `/ws`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AcceptedResponse, ActivateRequest, EventResponse};
use crate::app_state::AppState;
use crate::error::{ActivityError, ErrorResponse};
use crate::service::Trigger;

/// `POST /history/activate`: Switch the feed to an account.
///
/// # Errors
///
/// Returns [`ActivityError`] on a blank account or a closed trigger loop.
#[utoipa::path(
    post,
    path = "/api/v1/history/activate",
    tag = "History",
    summary = "Activate an account feed",
    description = "Retires the current feed and starts a new one for the given account and scope. The cached first page, if any, is painted before the network answers.",
    request_body = ActivateRequest,
    responses(
        (status = 202, description = "Activation queued", body = AcceptedResponse),
        (status = 400, description = "Invalid account", body = ErrorResponse),
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    Json(req): Json<ActivateRequest>,
) -> Result<impl IntoResponse, ActivityError> {
    let account = req.account()?;
    let response = AcceptedResponse::new("activate", Some(account.to_string()));
    send_trigger(
        &state,
        Trigger::AccountActivated {
            account,
            scope: req.scope,
        },
    )
    .await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// `POST /history/reload`: Reload the active feed from the network.
///
/// # Errors
///
/// Returns [`ActivityError::NoActiveAccount`] before any activation.
#[utoipa::path(
    post,
    path = "/api/v1/history/reload",
    tag = "History",
    summary = "Reload the active feed",
    description = "Discards the current sections and loads the first page from the network, skipping the cache.",
    responses(
        (status = 202, description = "Reload queued", body = AcceptedResponse),
        (status = 409, description = "No active account", body = ErrorResponse),
    )
)]
pub async fn reload(State(state): State<AppState>) -> Result<impl IntoResponse, ActivityError> {
    let paginator = state
        .controller
        .active()
        .ok_or(ActivityError::NoActiveAccount)?;
    let response = AcceptedResponse::new("reload", Some(paginator.account().to_string()));
    tokio::spawn(async move { paginator.reload().await });
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// `POST /history/next`: Load the next older page.
///
/// # Errors
///
/// Returns [`ActivityError::NoActiveAccount`] before any activation.
#[utoipa::path(
    post,
    path = "/api/v1/history/next",
    tag = "History",
    summary = "Load the next page",
    description = "Requests the page before the current cursor. Ignored while a fetch is in flight or once history is exhausted.",
    responses(
        (status = 202, description = "Request queued", body = AcceptedResponse),
        (status = 409, description = "No active account", body = ErrorResponse),
    )
)]
pub async fn load_next(State(state): State<AppState>) -> Result<impl IntoResponse, ActivityError> {
    let paginator = state
        .controller
        .active()
        .ok_or(ActivityError::NoActiveAccount)?;
    let response = AcceptedResponse::new("next", Some(paginator.account().to_string()));
    tokio::spawn(async move { paginator.load_next().await });
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// `POST /history/transaction-sent`: Signal a just-sent transaction.
///
/// # Errors
///
/// Returns [`ActivityError::Internal`] if the trigger loop is gone.
#[utoipa::path(
    post,
    path = "/api/v1/history/transaction-sent",
    tag = "History",
    summary = "Transaction sent",
    description = "Reloads the active feed immediately.",
    responses(
        (status = 202, description = "Trigger queued", body = AcceptedResponse),
    )
)]
pub async fn transaction_sent(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ActivityError> {
    send_trigger(&state, Trigger::TransactionSent).await?;
    let account = state.controller.active_account().map(|a| a.to_string());
    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse::new("transaction_sent", account)),
    ))
}

/// `POST /history/push`: Signal a background activity notification.
///
/// # Errors
///
/// Returns [`ActivityError::Internal`] if the trigger loop is gone.
#[utoipa::path(
    post,
    path = "/api/v1/history/push",
    tag = "History",
    summary = "Background update",
    description = "Reloads the active feed after the push settle delay. Pushes arriving within the delay collapse into one reload.",
    responses(
        (status = 202, description = "Trigger queued", body = AcceptedResponse),
    )
)]
pub async fn push(State(state): State<AppState>) -> Result<impl IntoResponse, ActivityError> {
    send_trigger(&state, Trigger::BackgroundUpdate).await?;
    let account = state.controller.active_account().map(|a| a.to_string());
    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse::new("push", account))))
}

/// `GET /history/events/{event_id}`: Look up one event.
///
/// # Errors
///
/// Returns [`ActivityError`] when no account is active, the event is
/// unknown, or the active scope filters it out.
#[utoipa::path(
    get,
    path = "/api/v1/history/events/{event_id}",
    tag = "History",
    summary = "Get event",
    description = "Fetches a single event of the active account through the active feed's source, so scope filters apply.",
    params(("event_id" = String, Path, description = "Indexer event identifier")),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "No active account", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, ActivityError> {
    let event = state.controller.load_event(&event_id).await?;
    Ok(Json(EventResponse { event }))
}

async fn send_trigger(state: &AppState, trigger: Trigger) -> Result<(), ActivityError> {
    state
        .triggers
        .send(trigger)
        .await
        .map_err(|_| ActivityError::Internal("trigger loop stopped".to_string()))
}

/// History routes (mounted under `/api/v1`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/history/activate", post(activate))
        .route("/history/reload", post(reload))
        .route("/history/next", post(load_next))
        .route("/history/transaction-sent", post(transaction_sent))
        .route("/history/push", post(push))
        .route("/history/events/{event_id}", get(get_event))
}
