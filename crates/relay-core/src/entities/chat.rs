//! Chat entity - a direct or group conversation and its memberships

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Priority, Snowflake};

/// Chat kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// Exactly two members
    Direct,
    /// N members with admin roles
    Group,
}

bitflags! {
    /// Per-member state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: i32 {
        /// Member may administer the chat (and post when admin-only)
        const ADMIN   = 1 << 0;
        /// Silent participant: persisted recipient rows, no visible broadcasts
        const GHOST   = 1 << 1;
        /// Member receives broadcasts but no push notifications
        const MUTED   = 1 << 2;
        /// Member has left or been removed; retained for history
        const REMOVED = 1 << 3;
    }
}

/// Per-priority alert thresholds in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub routine: i32,
    pub urgent: i32,
    pub emergency: i32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            routine: 240,
            urgent: 30,
            emergency: 5,
        }
    }
}

impl AlertThresholds {
    /// Threshold in minutes for one priority class
    #[must_use]
    pub fn minutes_for(&self, priority: Priority) -> i32 {
        match priority {
            Priority::Routine => self.routine,
            Priority::Urgent => self.urgent,
            Priority::Emergency => self.emergency,
        }
    }
}

/// Cached per-priority unread counters for one membership
///
/// A materialized view over unread MessageRecipient rows. Never authoritative:
/// always recomputable by a full scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnreadCounts {
    pub routine: i64,
    pub urgent: i64,
    pub emergency: i64,
    pub mentions: i64,
}

impl UnreadCounts {
    /// Count for one priority class
    #[must_use]
    pub fn for_priority(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Routine => self.routine,
            Priority::Urgent => self.urgent,
            Priority::Emergency => self.emergency,
        }
    }

    /// Mutable count for one priority class
    pub fn for_priority_mut(&mut self, priority: Priority) -> &mut i64 {
        match priority {
            Priority::Routine => &mut self.routine,
            Priority::Urgent => &mut self.urgent,
            Priority::Emergency => &mut self.emergency,
        }
    }

    /// Total unread messages across all classes
    #[must_use]
    pub fn total(&self) -> i64 {
        self.routine + self.urgent + self.emergency
    }

    /// True when nothing is unread
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total() == 0 && self.mentions == 0
    }
}

/// Chat membership: one (chat, user) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMember {
    pub chat_id: Snowflake,
    pub user_id: Snowflake,
    pub flags: MemberFlags,
    pub unread: UnreadCounts,
    pub joined_at: DateTime<Utc>,
}

impl ChatMember {
    /// Create a new plain membership
    pub fn new(chat_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            chat_id,
            user_id,
            flags: MemberFlags::empty(),
            unread: UnreadCounts::default(),
            joined_at: Utc::now(),
        }
    }

    /// Member still participates in the chat
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.flags.contains(MemberFlags::REMOVED)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.flags.contains(MemberFlags::ADMIN)
    }

    #[inline]
    pub fn is_ghost(&self) -> bool {
        self.flags.contains(MemberFlags::GHOST)
    }

    #[inline]
    pub fn is_muted(&self) -> bool {
        self.flags.contains(MemberFlags::MUTED)
    }
}

/// Chat entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Snowflake,
    pub kind: ChatKind,
    pub name: Option<String>,
    pub admin_only_posting: bool,
    pub thresholds: AlertThresholds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Create a new chat
    pub fn new(id: Snowflake, kind: ChatKind, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            name,
            admin_only_posting: false,
            thresholds: AlertThresholds::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.kind == ChatKind::Direct
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == ChatKind::Group
    }
}

/// Active members minus ghosts: the set eligible for visible room broadcasts.
///
/// Ghost filtering is applied exactly once, here, at the broadcast boundary.
pub fn visible_recipients(members: &[ChatMember]) -> Vec<Snowflake> {
    members
        .iter()
        .filter(|m| m.is_active() && !m.is_ghost())
        .map(|m| m.user_id)
        .collect()
}

/// Active members excluded from visible broadcasts (ghosts)
pub fn ghost_recipients(members: &[ChatMember]) -> Vec<Snowflake> {
    members
        .iter()
        .filter(|m| m.is_active() && m.is_ghost())
        .map(|m| m.user_id)
        .collect()
}
