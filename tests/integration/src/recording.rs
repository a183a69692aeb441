//! Recording transport doubles
//!
//! Capture everything the engines emit so tests can assert on broadcast
//! ordering, room targeting, exclusions, and push payloads.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use relay_core::{PushError, PushNotifier, PushPayload, RealtimeBroadcaster, RoomKey, Snowflake};
use serde_json::Value;

/// One recorded emit
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub room: Option<RoomKey>,
    pub connection_id: Option<String>,
    pub event: String,
    pub payload: Value,
    pub excluded: Vec<Snowflake>,
}

/// Broadcaster double with a real room/connection registry
#[derive(Default)]
pub struct RecordingBroadcaster {
    rooms: Mutex<HashMap<RoomKey, HashSet<String>>>,
    connection_users: Mutex<HashMap<String, Snowflake>>,
    events: Mutex<Vec<EmittedEvent>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live connection so room emits can resolve its user
    pub fn register_connection(&self, connection_id: &str, user_id: Snowflake) {
        self.connection_users
            .lock()
            .unwrap()
            .insert(connection_id.to_string(), user_id);
    }

    /// Everything emitted so far, in order
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Emits with a given event name, in order
    pub fn events_named(&self, event: &str) -> Vec<EmittedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event == event)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn room_size(&self, room: &RoomKey) -> usize {
        self.rooms
            .lock()
            .unwrap()
            .get(room)
            .map_or(0, HashSet::len)
    }
}

#[async_trait]
impl RealtimeBroadcaster for RecordingBroadcaster {
    async fn join_room(&self, connection_id: &str, room: RoomKey) -> bool {
        self.rooms
            .lock()
            .unwrap()
            .entry(room)
            .or_default()
            .insert(connection_id.to_string());
        true
    }

    async fn emit_to_room(
        &self,
        room: RoomKey,
        event: &str,
        payload: Value,
        exclude_users: &[Snowflake],
    ) -> usize {
        let reached = {
            let rooms = self.rooms.lock().unwrap();
            let users = self.connection_users.lock().unwrap();
            rooms.get(&room).map_or(0, |ids| {
                ids.iter()
                    .filter(|id| {
                        users
                            .get(*id)
                            .is_none_or(|user_id| !exclude_users.contains(user_id))
                    })
                    .count()
            })
        };

        self.events.lock().unwrap().push(EmittedEvent {
            room: Some(room),
            connection_id: None,
            event: event.to_string(),
            payload,
            excluded: exclude_users.to_vec(),
        });
        reached
    }

    async fn emit_to_connection(&self, connection_id: &str, event: &str, payload: Value) -> bool {
        self.events.lock().unwrap().push(EmittedEvent {
            room: None,
            connection_id: Some(connection_id.to_string()),
            event: event.to_string(),
            payload,
            excluded: Vec::new(),
        });
        true
    }
}

/// Push double; can be flipped into a failing mode
#[derive(Default)]
pub struct RecordingPushNotifier {
    payloads: Mutex<Vec<PushPayload>>,
    fail: AtomicBool,
}

impl RecordingPushNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent dispatch fail
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn payloads(&self) -> Vec<PushPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushNotifier for RecordingPushNotifier {
    async fn dispatch(&self, payload: &PushPayload) -> Result<(), PushError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PushError("push endpoint unavailable".to_string()));
        }
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
