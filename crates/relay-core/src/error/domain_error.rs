//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Chat not found: {0}")]
    ChatNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Reaction not found: {0}")]
    ReactionNotFound(Snowflake),

    #[error("Membership not found in chat")]
    MemberNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content is empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Quoted message must be in the same chat")]
    QuoteOutsideChat,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Sender is not an active member of the chat")]
    NotAChatMember,

    #[error("Only admins may post in this chat")]
    AdminOnlyPosting,

    #[error("Not the reaction owner")]
    NotReactionOwner,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for ack payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChatNotFound(_) => "UNKNOWN_CHAT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ReactionNotFound(_) => "UNKNOWN_REACTION",
            Self::MemberNotFound => "UNKNOWN_MEMBER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::QuoteOutsideChat => "QUOTE_OUTSIDE_CHAT",

            Self::NotAChatMember => "NOT_A_CHAT_MEMBER",
            Self::AdminOnlyPosting => "ADMIN_ONLY_POSTING",
            Self::NotReactionOwner => "NOT_REACTION_OWNER",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ChatNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ReactionNotFound(_)
                | Self::MemberNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::QuoteOutsideChat
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAChatMember | Self::AdminOnlyPosting | Self::NotReactionOwner
        )
    }
}
