//! Presence registry and service
//!
//! Tracks which users currently hold at least one live connection. The live
//! set is process-local and rebuildable from scratch on restart; only the
//! online/last-seen snapshot on the user row is durable.

use std::collections::HashSet;

use dashmap::DashMap;
use relay_core::value_objects::{RoomKey, Snowflake};
use serde_json::to_value;
use tracing::{info, instrument, warn};

use crate::dto::PresenceResponse;
use crate::events;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome of a presence registration change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceTransition {
    /// First connection: the user just came online
    CameOnline,
    /// Last connection closed: the user just went offline
    WentOffline,
    /// Other connections remain (or the change was a no-op)
    NoChange,
}

/// Connection sets per user, keyed by user id
///
/// Owned by the composition root and injected; never a global.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: DashMap<Snowflake, HashSet<String>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; reports whether this was the user's first
    pub fn on_connect(&self, user_id: Snowflake, connection_id: &str) -> PresenceTransition {
        let mut entry = self.connections.entry(user_id).or_default();
        let was_empty = entry.is_empty();
        let inserted = entry.insert(connection_id.to_string());

        if was_empty && inserted {
            PresenceTransition::CameOnline
        } else {
            PresenceTransition::NoChange
        }
    }

    /// Deregister a connection; reports whether the user just went offline.
    /// Unknown connection ids are an idempotent no-op.
    pub fn on_disconnect(&self, user_id: Snowflake, connection_id: &str) -> PresenceTransition {
        let Some(mut entry) = self.connections.get_mut(&user_id) else {
            return PresenceTransition::NoChange;
        };

        if !entry.remove(connection_id) {
            return PresenceTransition::NoChange;
        }

        if entry.is_empty() {
            drop(entry);
            self.connections.remove(&user_id);
            PresenceTransition::WentOffline
        } else {
            PresenceTransition::NoChange
        }
    }

    /// O(1) liveness check
    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|conns| !conns.is_empty())
    }

    /// Number of live connections for a user
    pub fn connection_count(&self, user_id: Snowflake) -> usize {
        self.connections.get(&user_id).map_or(0, |c| c.len())
    }

    /// Users currently holding at least one connection
    pub fn online_users(&self) -> Vec<Snowflake> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }

    /// Drop all registrations (shutdown path)
    pub fn clear(&self) {
        self.connections.clear();
    }
}

/// Presence service: registry transitions plus their durable and broadcast
/// side effects
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
    registry: &'a PresenceRegistry,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext, registry: &'a PresenceRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Register a new connection for a user
    ///
    /// On the user's first connection, persists `is_online = true` and
    /// broadcasts `user-online` to every chat room the user belongs to.
    #[instrument(skip(self))]
    pub async fn handle_connect(
        &self,
        user_id: Snowflake,
        connection_id: &str,
    ) -> ServiceResult<PresenceTransition> {
        let transition = self.registry.on_connect(user_id, connection_id);

        if transition == PresenceTransition::CameOnline {
            self.ctx.user_repo().mark_online(user_id).await?;
            info!(user_id = %user_id, "User came online");

            self.broadcast_presence(user_id, true, events::USER_ONLINE)
                .await?;
        }

        Ok(transition)
    }

    /// Deregister a connection for a user
    ///
    /// When the last connection closes, persists the offline snapshot with
    /// `last_seen_at` and broadcasts `user-offline`.
    #[instrument(skip(self))]
    pub async fn handle_disconnect(
        &self,
        user_id: Snowflake,
        connection_id: &str,
    ) -> ServiceResult<PresenceTransition> {
        let transition = self.registry.on_disconnect(user_id, connection_id);

        if transition == PresenceTransition::WentOffline {
            self.ctx.user_repo().mark_offline(user_id).await?;
            info!(user_id = %user_id, "User went offline");

            self.broadcast_presence(user_id, false, events::USER_OFFLINE)
                .await?;
        }

        Ok(transition)
    }

    /// O(1) liveness check against the live registry
    pub fn is_online(&self, user_id: Snowflake) -> bool {
        self.registry.is_online(user_id)
    }

    async fn broadcast_presence(
        &self,
        user_id: Snowflake,
        is_online: bool,
        event: &str,
    ) -> ServiceResult<()> {
        let payload = PresenceResponse {
            user_id,
            is_online,
            last_seen_at: if is_online {
                None
            } else {
                Some(chrono::Utc::now())
            },
        };
        let payload = to_value(&payload)
            .map_err(|e| ServiceError::internal(format!("Presence payload: {e}")))?;

        let chat_ids = self.ctx.chat_repo().chat_ids_for_user(user_id).await?;
        for chat_id in chat_ids {
            let reached = self
                .ctx
                .broadcaster()
                .emit_to_room(RoomKey::chat(chat_id), event, payload.clone(), &[])
                .await;
            if reached == 0 {
                // Nobody joined; fine, presence is best-effort
                warn!(chat_id = %chat_id, event, "Presence broadcast reached no connections");
            }
        }

        Ok(())
    }
}
