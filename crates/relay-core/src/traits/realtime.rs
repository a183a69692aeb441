//! Transport and notification ports
//!
//! The engines' only hard dependencies on the outside world: "join a named
//! room", "emit to a named room", "emit to one connection", and a best-effort
//! push collaborator.

use async_trait::async_trait;
use serde_json::Value;

use crate::value_objects::{RoomKey, Snowflake};

/// Broadcast port implemented by the gateway's connection manager
#[async_trait]
pub trait RealtimeBroadcaster: Send + Sync {
    /// Subscribe one connection to a room
    async fn join_room(&self, connection_id: &str, room: RoomKey) -> bool;

    /// Emit a named event to every connection in a room, skipping connections
    /// owned by any of `exclude_users`. Returns the number of connections
    /// the event reached.
    async fn emit_to_room(
        &self,
        room: RoomKey,
        event: &str,
        payload: Value,
        exclude_users: &[Snowflake],
    ) -> usize;

    /// Emit a named event to one connection
    async fn emit_to_connection(&self, connection_id: &str, event: &str, payload: Value) -> bool;
}

/// Push notification payload handed to the external collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPayload {
    pub tokens: Vec<String>,
    pub title: String,
    pub body: String,
    pub icon_url: Option<String>,
    pub deep_link_url: Option<String>,
}

/// Error from the push collaborator; always non-fatal to the caller
#[derive(Debug, thiserror::Error)]
#[error("Push dispatch failed: {0}")]
pub struct PushError(pub String);

/// Best-effort push delivery port
#[async_trait]
pub trait PushNotifier: Send + Sync {
    /// Deliver one push payload. Failures are logged and swallowed by the
    /// notification dispatcher; they never roll back persisted state.
    async fn dispatch(&self, payload: &PushPayload) -> Result<(), PushError>;
}
