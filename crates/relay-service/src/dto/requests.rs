//! Request DTOs for inbound socket events
//!
//! All request DTOs implement `Deserialize` and, where they carry free-form
//! content, `Validate`. Field names mirror the wire protocol (camelCase).

use relay_core::entities::MessageKind;
use relay_core::value_objects::{Priority, Snowflake};
use serde::Deserialize;
use validator::Validate;

fn default_kind() -> MessageKind {
    MessageKind::Text
}

fn default_priority() -> Priority {
    Priority::Routine
}

/// `join-chat` payload; omitting the chat id requests a full room resync
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChatRequest {
    pub chat_id: Option<Snowflake>,
}

/// `message` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: Snowflake,

    /// Message body
    #[serde(rename = "message", default)]
    #[validate(length(max = 4000, message = "Message body must be at most 4000 characters"))]
    pub body: String,

    /// Content kind: text or media
    #[serde(rename = "type", default = "default_kind")]
    pub kind: MessageKind,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,

    pub media_url: Option<String>,

    #[serde(default = "default_priority")]
    pub priority: Priority,

    pub quoted_message_id: Option<Snowflake>,

    #[serde(default)]
    pub mentioned_user_ids: Vec<Snowflake>,

    /// Recipients to annotate as cc on their recipient rows
    #[serde(default)]
    pub cc: Vec<Snowflake>,

    /// Recipients to annotate as bcc on their recipient rows
    #[serde(default)]
    pub bcc: Vec<Snowflake>,
}

/// `mark-read-chat` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub chat_id: Snowflake,
}

/// `req-create-message-reaction` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReactionRequest {
    pub chat_id: Snowflake,
    pub message_id: Snowflake,

    #[validate(length(min = 1, max = 64, message = "Emoji code must be 1-64 characters"))]
    pub emoji_code: String,
}

/// `req-delete-message-reaction` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReactionRequest {
    pub chat_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(rename = "reactId")]
    pub reaction_id: Snowflake,
}
