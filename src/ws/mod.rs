//! WebSocket layer: connection handling and message envelopes.
//!
//! The WebSocket endpoint at `/ws` streams pagination events of the active
//! feed and accepts paging commands.

pub mod connection;
pub mod handler;
pub mod messages;
