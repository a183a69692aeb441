//! Ports: repository traits and transport/notification boundaries

mod realtime;
mod repositories;

pub use realtime::{PushError, PushNotifier, PushPayload, RealtimeBroadcaster};
pub use repositories::{
    ChatRepository, MessageRepository, ReactionRepository, RecipientRepository, RepoResult,
    UserRepository,
};
