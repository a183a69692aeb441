//! Room key - the broadcast grouping primitive
//!
//! Rooms correspond 1:1 with chat conversations. The chat-id-to-room mapping
//! lives here as an explicit tagged type instead of string concatenation at
//! emit sites.

use crate::value_objects::Snowflake;
use serde::{Deserialize, Serialize};

/// Key identifying a broadcast room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKey {
    /// Room of a single chat conversation
    Chat(Snowflake),
}

impl RoomKey {
    /// Room for a chat conversation
    #[must_use]
    pub const fn chat(chat_id: Snowflake) -> Self {
        Self::Chat(chat_id)
    }

    /// The chat id this room carries, if it is a chat room
    #[must_use]
    pub const fn chat_id(&self) -> Option<Snowflake> {
        match self {
            Self::Chat(id) => Some(*id),
        }
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat(id) => write!(f, "chat:{id}"),
        }
    }
}
