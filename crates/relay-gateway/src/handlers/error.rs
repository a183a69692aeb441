//! Handler error type

use relay_service::ServiceError;
use thiserror::Error;

/// Error produced while handling one client frame
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame payload failed to deserialize into the expected request shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Unknown event name
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Error surfaced by a service call
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// Whether the failure was caused by the client
    ///
    /// Client faults are reported verbatim in the ack; server faults are
    /// masked behind a generic message and logged in full.
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        match self {
            Self::InvalidPayload(_) | Self::UnknownEvent(_) => true,
            Self::Service(e) => e.is_client_fault(),
        }
    }

    /// Message safe to put in an ack payload
    #[must_use]
    pub fn ack_message(&self) -> String {
        if self.is_client_fault() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
