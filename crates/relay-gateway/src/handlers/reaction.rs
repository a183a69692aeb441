//! Reaction handlers

use relay_service::dto::{CreateReactionRequest, DeleteReactionRequest};
use relay_service::{ReactionService, ServiceError};
use serde_json::{to_value, Value};

use super::error::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::server::GatewayState;

/// `req-create-message-reaction`: set (create or replace) a reaction
pub async fn handle_create(
    state: &GatewayState,
    connection: &Connection,
    request: CreateReactionRequest,
) -> HandlerResult<Option<Value>> {
    let response = ReactionService::new(&state.services, &state.presence)
        .set_reaction(connection.user_id, request)
        .await?;

    let data = to_value(response)
        .map_err(|e| HandlerError::Service(ServiceError::internal(e.to_string())))?;
    Ok(Some(data))
}

/// `req-delete-message-reaction`: remove one of the caller's reactions
pub async fn handle_delete(
    state: &GatewayState,
    connection: &Connection,
    request: DeleteReactionRequest,
) -> HandlerResult<Option<Value>> {
    let response = ReactionService::new(&state.services, &state.presence)
        .remove_reaction(connection.user_id, request)
        .await?;

    let data = to_value(response)
        .map_err(|e| HandlerError::Service(ServiceError::internal(e.to_string())))?;
    Ok(Some(data))
}
