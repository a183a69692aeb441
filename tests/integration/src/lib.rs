//! Integration test utilities for the relay gateway
//!
//! Provides in-memory repository implementations, recording transport
//! doubles, and fixtures for driving the realtime engines end to end
//! without a database or live sockets.

pub mod memory;
pub mod recording;

pub use fixtures::*;
pub use memory::MemoryStore;
pub use recording::{EmittedEvent, RecordingBroadcaster, RecordingPushNotifier};
