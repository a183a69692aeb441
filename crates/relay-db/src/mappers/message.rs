//! Message entity <-> model mapper

use relay_core::entities::{Message, MessageKind};
use relay_core::value_objects::{Priority, Snowflake};

use crate::models::MessageModel;

/// Parse a message kind column; unknown values degrade to text
fn message_kind_from_str(s: &str) -> MessageKind {
    match s {
        "media" => MessageKind::Media,
        _ => MessageKind::Text,
    }
}

/// Parse a priority column; unknown values degrade to routine
fn priority_from_str(s: &str) -> Priority {
    s.parse().unwrap_or(Priority::Routine)
}

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            chat_id: Snowflake::new(model.chat_id),
            sender_id: Snowflake::new(model.sender_id),
            kind: message_kind_from_str(&model.kind),
            body: model.body,
            subject: model.subject,
            media_url: model.media_url,
            priority: priority_from_str(&model.priority),
            quoted_message_id: model.quoted_message_id.map(Snowflake::new),
            mentioned_user_ids: model.mentioned_user_ids.into_iter().map(Snowflake::new).collect(),
            created_at: model.created_at,
            deleted_at: model.deleted_at,
        }
    }
}

/// Convert Message entity reference to values for database insertion
pub struct MessageInsert<'a> {
    pub id: i64,
    pub chat_id: i64,
    pub sender_id: i64,
    pub kind: &'static str,
    pub body: &'a str,
    pub subject: Option<&'a str>,
    pub media_url: Option<&'a str>,
    pub priority: &'static str,
    pub quoted_message_id: Option<i64>,
    pub mentioned_user_ids: Vec<i64>,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            chat_id: message.chat_id.into_inner(),
            sender_id: message.sender_id.into_inner(),
            kind: match message.kind {
                MessageKind::Text => "text",
                MessageKind::Media => "media",
            },
            body: &message.body,
            subject: message.subject.as_deref(),
            media_url: message.media_url.as_deref(),
            priority: message.priority.as_str(),
            quoted_message_id: message.quoted_message_id.map(Snowflake::into_inner),
            mentioned_user_ids: message
                .mentioned_user_ids
                .iter()
                .copied()
                .map(Snowflake::into_inner)
                .collect(),
        }
    }
}
