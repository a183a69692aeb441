//! Connection registry and room routing

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use relay_core::{RealtimeBroadcaster, RoomKey, Snowflake};
use serde_json::Value;
use tracing::{debug, warn};

use super::connection::Connection;
use crate::protocol::ServerFrame;

/// Registry of live connections with user and room indexes
///
/// All three maps are kept consistent by `add_connection`, `join_room` and
/// `remove_connection`; readers never observe a connection id in an index
/// without a matching entry in `connections` for longer than a removal takes.
pub struct ConnectionManager {
    /// All live connections by connection id
    connections: DashMap<String, Arc<Connection>>,

    /// Connection ids per user (one user may hold several devices)
    user_connections: DashMap<Snowflake, HashSet<String>>,

    /// Connection ids per joined room
    room_connections: DashMap<RoomKey, HashSet<String>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Register a connection and index it under its user
    pub fn add_connection(&self, connection: Arc<Connection>) {
        self.user_connections
            .entry(connection.user_id)
            .or_default()
            .insert(connection.id.clone());
        self.connections
            .insert(connection.id.clone(), connection.clone());

        debug!(
            connection_id = %connection.id,
            user_id = %connection.user_id,
            "Connection registered"
        );
    }

    /// Remove a connection and scrub it from every index
    pub fn remove_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(connection_id)?;

        if let Some(mut ids) = self.user_connections.get_mut(&connection.user_id) {
            ids.remove(connection_id);
        }
        self.user_connections
            .remove_if(&connection.user_id, |_, ids| ids.is_empty());

        self.room_connections.alter_all(|_, mut ids| {
            ids.remove(connection_id);
            ids
        });
        self.room_connections.retain(|_, ids| !ids.is_empty());

        debug!(
            connection_id = %connection_id,
            user_id = %connection.user_id,
            "Connection removed"
        );

        Some(connection)
    }

    pub fn get(&self, connection_id: &str) -> Option<Arc<Connection>> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// All live connections, for idle sweeps
    pub fn all_connections(&self) -> Vec<Arc<Connection>> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Connection ids joined to a room
    fn room_members(&self, room: &RoomKey) -> Vec<String> {
        self.room_connections
            .get(room)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeBroadcaster for ConnectionManager {
    async fn join_room(&self, connection_id: &str, room: RoomKey) -> bool {
        let Some(connection) = self.get(connection_id) else {
            warn!(connection_id = %connection_id, "Join for unknown connection");
            return false;
        };

        self.room_connections
            .entry(room)
            .or_default()
            .insert(connection_id.to_string());
        connection.add_room(room).await;
        true
    }

    async fn emit_to_room(
        &self,
        room: RoomKey,
        event: &str,
        payload: Value,
        exclude_users: &[Snowflake],
    ) -> usize {
        let mut delivered = 0;
        for connection_id in self.room_members(&room) {
            let Some(connection) = self.get(&connection_id) else {
                continue;
            };
            if exclude_users.contains(&connection.user_id) {
                continue;
            }
            if connection
                .send(ServerFrame::event(event, payload.clone()))
                .await
            {
                delivered += 1;
            }
        }

        debug!(room = %room, event = %event, delivered, "Room emit");
        delivered
    }

    async fn emit_to_connection(&self, connection_id: &str, event: &str, payload: Value) -> bool {
        match self.get(connection_id) {
            Some(connection) => connection.send(ServerFrame::event(event, payload)).await,
            None => false,
        }
    }
}
