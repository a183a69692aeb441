//! Repository implementations

mod chat;
mod error;
mod message;
mod reaction;
mod recipient;
mod user;

pub use chat::PgChatRepository;
pub use message::PgMessageRepository;
pub use reaction::PgReactionRepository;
pub use recipient::PgRecipientRepository;
pub use user::PgUserRepository;
