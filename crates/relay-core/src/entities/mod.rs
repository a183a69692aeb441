//! Domain entities - core business objects

mod chat;
mod message;
mod reaction;
mod recipient;
mod user;

pub use chat::{
    ghost_recipients, visible_recipients, AlertThresholds, Chat, ChatKind, ChatMember,
    MemberFlags, UnreadCounts,
};
pub use message::{Message, MessageKind};
pub use reaction::Reaction;
pub use recipient::{DeliveryAnnotation, MessageRecipient};
pub use user::User;
