//! WebSocket handshake and socket lifecycle

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use relay_service::PresenceService;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::state::GatewayState;
use crate::connection::Connection;
use crate::handlers;
use crate::protocol::ClientFrame;

/// Frames buffered per connection before sends start failing
const OUTBOUND_BUFFER: usize = 256;

/// Connections with no inbound traffic for this long are closed
const IDLE_TIMEOUT_SECS: u64 = 90;

/// How often idle state is checked
const IDLE_SWEEP_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct HandshakeQuery {
    token: Option<String>,
}

/// `GET /gateway?token=<jwt>`
///
/// The token is verified before the upgrade completes, so a socket is only
/// ever established for an authenticated user.
pub async fn gateway_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HandshakeQuery>,
    State(state): State<GatewayState>,
) -> Response {
    let Some(token) = query.token else {
        debug!("Handshake rejected: missing token");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let user_id = match state.jwt.authenticate(&token) {
        Ok(user_id) => user_id,
        Err(e) => {
            debug!(error = %e, "Handshake rejected: invalid token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Drive one socket from registration to cleanup
async fn handle_socket(socket: WebSocket, state: GatewayState, user_id: relay_core::Snowflake) {
    let (frame_tx, mut frame_rx) = mpsc::channel(OUTBOUND_BUFFER);
    let connection = Arc::new(Connection::new(user_id, frame_tx));
    state.connections.add_connection(connection.clone());

    info!(
        connection_id = %connection.id,
        user_id = %user_id,
        total = state.connections.connection_count(),
        "Connection established"
    );

    let presence = PresenceService::new(&state.services, &state.presence);
    if let Err(e) = presence.handle_connect(user_id, &connection.id).await {
        // Presence is recoverable on the next resync; keep the socket
        warn!(user_id = %user_id, error = %e, "Presence connect failed");
    }

    let (mut sink, mut stream) = socket.split();

    // Outbound: drain queued frames into the socket
    let send_task = tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
            match frame.to_json() {
                Ok(text) => {
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!(error = %e, "Outbound frame serialization failed"),
            }
        }
        let _ = sink.close().await;
    });

    // Inbound: dispatch frames until close or idle timeout
    let mut idle_check = tokio::time::interval(Duration::from_secs(IDLE_SWEEP_INTERVAL_SECS));
    idle_check.tick().await;
    loop {
        tokio::select! {
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        connection.touch().await;
                        match ClientFrame::from_json(&text) {
                            Ok(frame) => {
                                handlers::dispatch(&state, &connection, frame).await;
                            }
                            Err(e) => {
                                debug!(
                                    connection_id = %connection.id,
                                    error = %e,
                                    "Unparseable frame dropped"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        connection.touch().await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Binary(_))) => {
                        debug!(connection_id = %connection.id, "Binary frame dropped");
                    }
                    Some(Err(e)) => {
                        debug!(connection_id = %connection.id, error = %e, "Socket read error");
                        break;
                    }
                }
            }
            _ = idle_check.tick() => {
                if connection.idle_secs().await >= IDLE_TIMEOUT_SECS {
                    info!(
                        connection_id = %connection.id,
                        user_id = %user_id,
                        "Idle connection closed"
                    );
                    break;
                }
            }
        }
    }

    send_task.abort();
    cleanup(&state, &connection).await;
}

/// Deregister the connection and settle presence
async fn cleanup(state: &GatewayState, connection: &Connection) {
    state.connections.remove_connection(&connection.id);

    let presence = PresenceService::new(&state.services, &state.presence);
    if let Err(e) = presence
        .handle_disconnect(connection.user_id, &connection.id)
        .await
    {
        warn!(user_id = %connection.user_id, error = %e, "Presence disconnect failed");
    }

    info!(
        connection_id = %connection.id,
        user_id = %connection.user_id,
        duration_secs = connection.connected_at.elapsed().as_secs(),
        total = state.connections.connection_count(),
        "Connection closed"
    );
}
