//! Database models with SQLx FromRow derives

mod chat;
mod message;
mod reaction;
mod recipient;
mod user;

pub use chat::{ChatMemberModel, ChatModel, UnreadCountModel};
pub use message::MessageModel;
pub use reaction::ReactionModel;
pub use recipient::RecipientModel;
pub use user::UserModel;
