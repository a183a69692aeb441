//! Reaction entity - an emoji reaction on a message
//!
//! At most one reaction per (message, user): a repeat reaction replaces the
//! prior emoji (upsert keyed on message+user).

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(id: Snowflake, message_id: Snowflake, user_id: Snowflake, emoji: String) -> Self {
        Self {
            id,
            message_id,
            user_id,
            emoji,
            created_at: Utc::now(),
        }
    }

    /// Check if reaction uses a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji: &str) -> bool {
        self.emoji == emoji
    }
}
