//! # relay-gateway
//!
//! WebSocket gateway: authenticates sockets, tracks connections and rooms,
//! dispatches client frames into the service layer, and hosts the
//! composition root wiring repositories, broadcaster, and push client.

pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod push;
pub mod server;

pub use connection::{Connection, ConnectionManager};
pub use protocol::{AckPayload, ClientFrame, ServerFrame};
pub use server::{create_app, create_gateway_state, run_server, GatewayState};
