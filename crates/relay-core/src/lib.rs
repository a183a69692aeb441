//! # relay-core
//!
//! Domain layer containing entities, value objects, repository traits, and
//! the transport/notification ports. This crate has zero dependencies on
//! infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ghost_recipients, visible_recipients, AlertThresholds, Chat, ChatKind, ChatMember,
    MemberFlags, Message, MessageKind, MessageRecipient, Reaction, UnreadCounts, User,
};
pub use error::DomainError;
pub use traits::{
    ChatRepository, MessageRepository, PushError, PushNotifier, PushPayload,
    ReactionRepository, RealtimeBroadcaster, RecipientRepository, RepoResult, UserRepository,
};
pub use value_objects::{Priority, RoomKey, Snowflake, SnowflakeGenerator, SnowflakeParseError};
