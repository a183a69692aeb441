//! Gateway wire protocol

mod frames;

pub use frames::{AckPayload, ClientFrame, ServerFrame};

/// Client-originated event names
pub mod client_events {
    pub const JOIN_CHAT: &str = "join-chat";
    pub const MESSAGE: &str = "message";
    pub const MARK_READ_CHAT: &str = "mark-read-chat";
    pub const CREATE_MESSAGE_REACTION: &str = "req-create-message-reaction";
    pub const DELETE_MESSAGE_REACTION: &str = "req-delete-message-reaction";
}
