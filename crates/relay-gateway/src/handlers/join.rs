//! `join-chat` handler

use relay_service::dto::JoinChatRequest;
use relay_service::{RoomService, UnreadService};
use serde_json::{json, Value};

use super::error::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;

/// Join one room, or resync everything when no chat id is given
///
/// The resync path subscribes the connection to every member room and
/// recomputes the cached unread counters from the recipient rows, returning
/// the fresh counts so the client can redraw its badge state.
pub async fn handle(
    state: &GatewayState,
    connection: &Connection,
    request: JoinChatRequest,
) -> HandlerResult<Option<Value>> {
    let rooms = RoomService::new(&state.services);

    match request.chat_id {
        Some(chat_id) => {
            rooms
                .join_explicit(&connection.id, connection.user_id, chat_id)
                .await?;
            Ok(None)
        }
        None => {
            let joined = rooms.join_all(&connection.id, connection.user_id).await?;
            let counts = UnreadService::new(&state.services)
                .recompute_unread_counts(connection.user_id)
                .await?;

            let unread: Vec<Value> = counts
                .iter()
                .map(|(chat_id, c)| {
                    json!({
                        "chatId": chat_id,
                        "routine": c.routine,
                        "urgent": c.urgent,
                        "emergency": c.emergency,
                        "mentions": c.mentions,
                    })
                })
                .collect();

            Ok(Some(json!({ "joined": joined, "unread": unread })))
        }
    }
}
