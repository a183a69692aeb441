//! Chat and membership database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chats table
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: i64,
    pub kind: String,
    pub name: Option<String>,
    pub admin_only_posting: bool,
    pub routine_threshold_mins: i32,
    pub urgent_threshold_mins: i32,
    pub emergency_threshold_mins: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for chat_members table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMemberModel {
    pub chat_id: i64,
    pub user_id: i64,
    pub flags: i32,
    pub unread_routine: i64,
    pub unread_urgent: i64,
    pub unread_emergency: i64,
    pub unread_mentions: i64,
    pub joined_at: DateTime<Utc>,
}

/// Aggregated unread counters per chat, derived from recipient rows
#[derive(Debug, Clone, FromRow)]
pub struct UnreadCountModel {
    pub chat_id: i64,
    pub routine: i64,
    pub urgent: i64,
    pub emergency: i64,
    pub mentions: i64,
}
