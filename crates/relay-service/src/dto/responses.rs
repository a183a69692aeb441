//! Response DTOs for outbound socket events
//!
//! All response DTOs implement `Serialize` for JSON output. Snowflake IDs are
//! serialized as strings for JavaScript compatibility; field names mirror the
//! wire protocol (camelCase).

use chrono::{DateTime, Utc};
use relay_core::entities::MessageKind;
use relay_core::value_objects::{Priority, Snowflake};
use serde::Serialize;

/// Sender display metadata embedded in hydrated message payloads
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderResponse {
    pub id: Snowflake,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Snapshot of a quoted message embedded in the quoting message's payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedMessageResponse {
    pub id: Snowflake,
    pub sender_id: Snowflake,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub body: String,
    pub deleted: bool,
}

/// Fully hydrated message payload for `new-message` broadcasts and send acks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender: SenderResponse,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_message: Option<QuotedMessageResponse>,
    pub mentioned_user_ids: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
}

/// One reaction in an `update-realtime-message` payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji_code: String,
    pub created_at: DateTime<Utc>,
}

/// `update-realtime-message` payload: full recomputed reaction list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReactionsResponse {
    pub chat_id: Snowflake,
    pub message_id: Snowflake,
    pub reactions: Vec<ReactionResponse>,
}

/// `res-mark-read-chat` payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub chat_id: Snowflake,
    pub user_id: Snowflake,
    /// Number of recipient rows that flipped to read
    pub updated: u64,
}

/// `user-online` / `user-offline` payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub user_id: Snowflake,
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}
