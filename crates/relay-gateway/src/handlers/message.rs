//! `message` handler

use relay_service::dto::SendMessageRequest;
use relay_service::MessageService;
use serde_json::{to_value, Value};

use super::error::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::server::GatewayState;

/// Persist and fan out a message; the ack carries the hydrated message so
/// the sender can render it without waiting for its own broadcast
pub async fn handle(
    state: &GatewayState,
    connection: &Connection,
    request: SendMessageRequest,
) -> HandlerResult<Option<Value>> {
    let response = MessageService::new(&state.services, &state.presence)
        .send_message(connection.user_id, request)
        .await?;

    let data = to_value(response)
        .map_err(|e| HandlerError::Service(relay_service::ServiceError::internal(e.to_string())))?;
    Ok(Some(data))
}
