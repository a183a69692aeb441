//! Message entity - an immutable (once sent) unit of chat content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Priority, Snowflake};

/// Message content kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Media,
}

/// Message entity
///
/// Soft-deletable: delete sets `deleted_at` and clears displayable content,
/// but the row persists so quotes, recipients and reactions keep valid
/// foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub chat_id: Snowflake,
    pub sender_id: Snowflake,
    pub kind: MessageKind,
    pub body: String,
    pub subject: Option<String>,
    pub media_url: Option<String>,
    pub priority: Priority,
    pub quoted_message_id: Option<Snowflake>,
    pub mentioned_user_ids: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new text message
    pub fn new_text(
        id: Snowflake,
        chat_id: Snowflake,
        sender_id: Snowflake,
        body: String,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            chat_id,
            sender_id,
            kind: MessageKind::Text,
            body,
            subject: None,
            media_url: None,
            priority,
            quoted_message_id: None,
            mentioned_user_ids: Vec::new(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Create a new media message
    pub fn new_media(
        id: Snowflake,
        chat_id: Snowflake,
        sender_id: Snowflake,
        media_url: String,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            chat_id,
            sender_id,
            kind: MessageKind::Media,
            body: String::new(),
            subject: None,
            media_url: Some(media_url),
            priority,
            quoted_message_id: None,
            mentioned_user_ids: Vec::new(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_quote(&self) -> bool {
        self.quoted_message_id.is_some()
    }

    #[inline]
    pub fn is_media(&self) -> bool {
        self.kind == MessageKind::Media
    }

    /// Check if message has no displayable content
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty() && self.media_url.is_none()
    }

    /// Truncated body on a char boundary, for notification previews
    pub fn preview(&self, max_len: usize) -> &str {
        if self.body.len() <= max_len {
            &self.body
        } else {
            let mut end = max_len;
            while !self.body.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.body[..end]
        }
    }

    /// Soft delete: flag the row and clear displayable content
    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.body.clear();
        self.subject = None;
        self.media_url = None;
    }
}
