//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub kind: String,
    pub body: String,
    pub subject: Option<String>,
    pub media_url: Option<String>,
    pub priority: String,
    pub quoted_message_id: Option<i64>,
    pub mentioned_user_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl MessageModel {
    /// Check if message is soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if message quotes another message
    #[inline]
    pub fn is_quote(&self) -> bool {
        self.quoted_message_id.is_some()
    }
}
