//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub push_token: Option<String>,
    pub is_online: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Check if the user has a registered push token
    #[inline]
    pub fn has_push_token(&self) -> bool {
        self.push_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
