//! Entity <-> model mappers

mod chat;
mod message;
mod reaction;
mod recipient;
mod user;

pub use message::MessageInsert;
pub(crate) use recipient::annotation_to_str;
