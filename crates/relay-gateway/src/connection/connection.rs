//! Single client connection

use std::collections::HashSet;
use std::time::Instant;

use relay_core::{RoomKey, Snowflake};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::protocol::ServerFrame;

/// One authenticated socket
///
/// The user is known at creation because the handshake verifies the token
/// before the upgrade completes.
pub struct Connection {
    /// Unique connection id
    pub id: String,

    /// Owner of this connection
    pub user_id: Snowflake,

    /// Outbound frame channel, drained by the socket's send task
    sender: mpsc::Sender<ServerFrame>,

    /// Rooms this connection has joined
    rooms: RwLock<HashSet<RoomKey>>,

    /// Last inbound activity, used for idle detection
    last_activity: RwLock<Instant>,

    /// When the connection was established
    pub connected_at: Instant,
}

impl Connection {
    pub fn new(user_id: Snowflake, sender: mpsc::Sender<ServerFrame>) -> Self {
        Self {
            id: Self::generate_id(),
            user_id,
            sender,
            rooms: RwLock::new(HashSet::new()),
            last_activity: RwLock::new(Instant::now()),
            connected_at: Instant::now(),
        }
    }

    /// Generate a unique connection id
    fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Queue a frame for delivery; returns false if the send task is gone
    pub async fn send(&self, frame: ServerFrame) -> bool {
        self.sender.send(frame).await.is_ok()
    }

    /// Try to queue a frame without waiting; drops the frame if the outbound
    /// buffer is full
    pub fn try_send(&self, frame: ServerFrame) -> bool {
        self.sender.try_send(frame).is_ok()
    }

    pub async fn add_room(&self, room: RoomKey) {
        self.rooms.write().await.insert(room);
    }

    pub async fn in_room(&self, room: &RoomKey) -> bool {
        self.rooms.read().await.contains(room)
    }

    pub async fn rooms(&self) -> Vec<RoomKey> {
        self.rooms.read().await.iter().copied().collect()
    }

    /// Record inbound traffic for idle tracking
    pub async fn touch(&self) {
        *self.last_activity.write().await = Instant::now();
    }

    /// Seconds since the last inbound frame
    pub async fn idle_secs(&self) -> u64 {
        self.last_activity.read().await.elapsed().as_secs()
    }
}
