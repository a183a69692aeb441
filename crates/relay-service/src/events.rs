//! Server-emitted event names
//!
//! Shared by the services (which emit through the broadcast port) and the
//! gateway (which routes inbound frames and writes acks).

/// Hydrated message broadcast to a chat room
pub const NEW_MESSAGE: &str = "new-message";

/// Read-state convergence broadcast to a chat room
pub const RES_MARK_READ_CHAT: &str = "res-mark-read-chat";

/// Recomputed reaction list broadcast to a chat room
pub const UPDATE_REALTIME_MESSAGE: &str = "update-realtime-message";

/// Presence transition broadcasts
pub const USER_ONLINE: &str = "user-online";
pub const USER_OFFLINE: &str = "user-offline";
