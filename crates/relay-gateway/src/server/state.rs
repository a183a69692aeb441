//! Shared gateway state

use std::sync::Arc;

use relay_common::{AppConfig, JwtService};
use relay_service::{PresenceRegistry, ServiceContext};

use crate::connection::ConnectionManager;

/// State shared by every socket and handler
#[derive(Clone)]
pub struct GatewayState {
    /// Service layer dependency container
    pub services: Arc<ServiceContext>,

    /// Live connection registry; also the broadcaster wired into `services`
    pub connections: Arc<ConnectionManager>,

    /// In-memory presence registry shared with the presence engine
    pub presence: Arc<PresenceRegistry>,

    /// Token verifier for the handshake
    pub jwt: Arc<JwtService>,

    /// Application configuration
    pub config: Arc<AppConfig>,
}
