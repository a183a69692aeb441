//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; the infrastructure layer provides
//! the implementation.

use async_trait::async_trait;

use crate::entities::{
    Chat, ChatMember, MemberFlags, Message, MessageRecipient, Reaction, UnreadCounts, User,
};
use crate::error::DomainError;
use crate::value_objects::{Priority, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find several users at once (payload hydration, push token lookup)
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Durable presence snapshot: user came online
    async fn mark_online(&self, id: Snowflake) -> RepoResult<()>;

    /// Durable presence snapshot: user went offline, record last seen
    async fn mark_offline(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Find chat by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>>;

    /// All memberships of a chat, including removed and ghost members
    async fn find_members(&self, chat_id: Snowflake) -> RepoResult<Vec<ChatMember>>;

    /// One membership row
    async fn find_member(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChatMember>>;

    /// Ids of all chats where the user is a non-removed member (room resync)
    async fn chat_ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Update a membership's flags (admin/ghost/mute/removed)
    async fn update_member_flags(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        flags: MemberFlags,
    ) -> RepoResult<()>;

    /// Set-based unread counter increment for the given recipients,
    /// plus mention counters for the mentioned subset
    async fn bump_unread(
        &self,
        chat_id: Snowflake,
        recipient_ids: &[Snowflake],
        priority: Priority,
        mentioned_ids: &[Snowflake],
    ) -> RepoResult<()>;

    /// Zero one member's cached counters (all priority classes and mentions)
    async fn reset_unread(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Overwrite cached counters from a recomputation pass
    async fn write_unread_counts(
        &self,
        user_id: Snowflake,
        counts: &[(Snowflake, UnreadCounts)],
    ) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID (excluding soft-deleted rows)
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Persist a message together with its recipient rows and the owning
    /// chat's `updated_at` bump, in one transaction.
    ///
    /// The broadcast that follows a send must only happen after this returns
    /// `Ok`; there is no partial-commit state to observe.
    async fn create(
        &self,
        message: &Message,
        recipients: &[MessageRecipient],
    ) -> RepoResult<()>;

    /// Soft delete: set the flag and clear displayable content, keep the row
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Recipient Repository
// ============================================================================

#[async_trait]
pub trait RecipientRepository: Send + Sync {
    /// All recipient rows of one message
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<MessageRecipient>>;

    /// Monotonic set-based mark-read for one (chat, user) pair.
    ///
    /// Returns the number of rows that actually flipped false→true; zero
    /// means the caller was already synchronized.
    async fn mark_read(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<u64>;

    /// Re-derive per-chat unread counts for one user by scanning unread rows
    /// joined to message priority (ground truth for the counter cache)
    async fn unread_counts(&self, user_id: Snowflake)
        -> RepoResult<Vec<(Snowflake, UnreadCounts)>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find reaction by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reaction>>;

    /// All reactions on a message, oldest first
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>>;

    /// Upsert keyed on (message, user): a repeat reaction from the same user
    /// replaces the emoji instead of adding a row
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Hard delete one reaction
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}
