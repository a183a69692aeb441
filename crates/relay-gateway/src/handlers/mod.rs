//! Client frame dispatch
//!
//! Routes inbound frames by event name to their handlers and answers acks.
//! Handlers return the optional ack data; server-fault errors are logged in
//! full here and masked in the ack.

mod error;
mod join;
mod mark_read;
mod message;
mod reaction;

pub use error::{HandlerError, HandlerResult};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::connection::Connection;
use crate::protocol::{client_events, AckPayload, ClientFrame, ServerFrame};
use crate::server::GatewayState;

/// Handle one client frame end to end: route, ack, log
pub async fn dispatch(state: &GatewayState, connection: &Connection, frame: ClientFrame) {
    let event = frame.event.clone();
    let result = route(state, connection, &event, frame.data).await;

    match &result {
        Ok(_) => {
            debug!(
                connection_id = %connection.id,
                user_id = %connection.user_id,
                event = %event,
                "Event handled"
            );
        }
        Err(e) if e.is_client_fault() => {
            debug!(
                connection_id = %connection.id,
                user_id = %connection.user_id,
                event = %event,
                error = %e,
                "Event rejected"
            );
        }
        Err(e) => {
            error!(
                connection_id = %connection.id,
                user_id = %connection.user_id,
                event = %event,
                error = %e,
                "Event failed"
            );
        }
    }

    if let Some(ack_id) = frame.ack {
        let payload = match result {
            Ok(Some(data)) => AckPayload::ok_with(data),
            Ok(None) => AckPayload::ok(),
            Err(e) => AckPayload::error(e.ack_message()),
        };
        connection
            .send(ServerFrame::ack(&event, ack_id, payload))
            .await;
    }
}

async fn route(
    state: &GatewayState,
    connection: &Connection,
    event: &str,
    data: Value,
) -> HandlerResult<Option<Value>> {
    match event {
        client_events::JOIN_CHAT => join::handle(state, connection, parse(data)?).await,
        client_events::MESSAGE => message::handle(state, connection, parse(data)?).await,
        client_events::MARK_READ_CHAT => mark_read::handle(state, connection, parse(data)?).await,
        client_events::CREATE_MESSAGE_REACTION => {
            reaction::handle_create(state, connection, parse(data)?).await
        }
        client_events::DELETE_MESSAGE_REACTION => {
            reaction::handle_delete(state, connection, parse(data)?).await
        }
        other => Err(HandlerError::UnknownEvent(other.to_string())),
    }
}

/// Deserialize a frame payload into its request shape
fn parse<T: DeserializeOwned>(data: Value) -> HandlerResult<T> {
    serde_json::from_value(data).map_err(|e| HandlerError::InvalidPayload(e.to_string()))
}
