//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding pagination events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage};
use crate::app_state::AppState;
use crate::domain::{AccountAddress, PaginationEvent};
use crate::error::ActivityError;
use crate::service::Trigger;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards every event from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<PaginationEvent>,
    state: AppState,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &state).await;
                        if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        let json = WsMessage::event(&event).to_json();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client and returns the reply envelope.
async fn handle_text_message(text: &str, state: &AppState) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };
    let name = command.name();
    match dispatch(command, state).await {
        Ok(account) => WsMessage::response(
            msg.id,
            serde_json::json!({ "accepted": name, "account": account.map(|a| a.to_string()) }),
        ),
        Err(err) => WsMessage::error(msg.id, err.error_code(), &err.to_string()),
    }
}

async fn dispatch(
    command: WsCommand,
    state: &AppState,
) -> Result<Option<AccountAddress>, ActivityError> {
    match command {
        WsCommand::Activate { account, scope } => {
            let account = account.trim();
            if account.is_empty() {
                return Err(ActivityError::InvalidRequest(
                    "account must not be empty".to_string(),
                ));
            }
            let account = AccountAddress::new(account);
            state
                .triggers
                .send(Trigger::AccountActivated {
                    account: account.clone(),
                    scope,
                })
                .await
                .map_err(|_| ActivityError::Internal("trigger loop stopped".to_string()))?;
            Ok(Some(account))
        }
        WsCommand::Reload => {
            let paginator = state
                .controller
                .active()
                .ok_or(ActivityError::NoActiveAccount)?;
            let account = paginator.account().clone();
            tokio::spawn(async move { paginator.reload().await });
            Ok(Some(account))
        }
        WsCommand::LoadNext => {
            let paginator = state
                .controller
                .active()
                .ok_or(ActivityError::NoActiveAccount)?;
            let account = paginator.account().clone();
            tokio::spawn(async move { paginator.load_next().await });
            Ok(Some(account))
        }
    }
}
