//! Value objects - immutable domain primitives

mod priority;
mod room;
mod snowflake;

pub use priority::Priority;
pub use room::RoomKey;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
