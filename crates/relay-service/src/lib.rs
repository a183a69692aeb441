//! # relay-service
//!
//! Application layer containing the realtime engines, services, and DTOs.

pub mod dto;
pub mod events;
pub mod services;

pub use services::{
    MarkReadOutcome, MessageService, NotificationService, PresenceRegistry, PresenceService,
    PresenceTransition, ReactionService, RoomService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, UnreadService,
};
