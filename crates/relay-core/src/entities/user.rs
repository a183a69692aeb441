//! User entity - the slice of the user row the realtime core reads and writes
//!
//! Account management belongs to the HTTP collaborator; the core needs
//! display metadata, the push token, and the durable presence snapshot.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Registered mobile push token, if any
    pub push_token: Option<String>,
    /// Durable presence snapshot, updated on transitions
    pub is_online: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if the user can receive push notifications
    #[inline]
    pub fn has_push_token(&self) -> bool {
        self.push_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
