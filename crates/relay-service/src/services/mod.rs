//! Business logic services
//!
//! This module contains the realtime engines: presence, room membership,
//! message fan-out, read/unread reconciliation, and the reaction and
//! notification dispatchers.

pub mod context;
pub mod error;
pub mod fanout;
pub mod notify;
pub mod presence;
pub mod reaction;
pub mod rooms;
pub mod unread;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use fanout::MessageService;
pub use notify::NotificationService;
pub use presence::{PresenceRegistry, PresenceService, PresenceTransition};
pub use reaction::ReactionService;
pub use rooms::RoomService;
pub use unread::{MarkReadOutcome, UnreadService};
