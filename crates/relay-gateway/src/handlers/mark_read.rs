//! `mark-read-chat` handler

use relay_service::dto::MarkReadRequest;
use relay_service::{MarkReadOutcome, UnreadService};
use serde_json::{json, Value};

use super::error::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;

/// Mark a chat fully read for the caller
///
/// The ack always succeeds with the number of rows flipped; the room
/// broadcast only happens when that number is non-zero.
pub async fn handle(
    state: &GatewayState,
    connection: &Connection,
    request: MarkReadRequest,
) -> HandlerResult<Option<Value>> {
    let outcome = UnreadService::new(&state.services)
        .mark_read(connection.user_id, request.chat_id)
        .await?;

    let updated = match outcome {
        MarkReadOutcome::Updated(n) => n,
        MarkReadOutcome::AlreadySynchronized => 0,
    };

    Ok(Some(json!({ "chatId": request.chat_id, "updated": updated })))
}
