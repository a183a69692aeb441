//! MessageRecipient database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for message_recipients table
#[derive(Debug, Clone, FromRow)]
pub struct RecipientModel {
    pub id: i64,
    pub message_id: i64,
    pub chat_id: i64,
    pub recipient_id: i64,
    pub is_read: bool,
    pub annotation: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
}
