//! Chat and membership entity <-> model mappers

use relay_core::entities::{
    AlertThresholds, Chat, ChatKind, ChatMember, MemberFlags, UnreadCounts,
};
use relay_core::value_objects::Snowflake;

use crate::models::{ChatMemberModel, ChatModel, UnreadCountModel};

/// Parse a chat kind column; unknown values degrade to group
fn chat_kind_from_str(s: &str) -> ChatKind {
    match s {
        "direct" => ChatKind::Direct,
        _ => ChatKind::Group,
    }
}

impl From<ChatModel> for Chat {
    fn from(model: ChatModel) -> Self {
        Chat {
            id: Snowflake::new(model.id),
            kind: chat_kind_from_str(&model.kind),
            name: model.name,
            admin_only_posting: model.admin_only_posting,
            thresholds: AlertThresholds {
                routine: model.routine_threshold_mins,
                urgent: model.urgent_threshold_mins,
                emergency: model.emergency_threshold_mins,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ChatMemberModel> for ChatMember {
    fn from(model: ChatMemberModel) -> Self {
        ChatMember {
            chat_id: Snowflake::new(model.chat_id),
            user_id: Snowflake::new(model.user_id),
            flags: MemberFlags::from_bits_truncate(model.flags),
            unread: UnreadCounts {
                routine: model.unread_routine,
                urgent: model.unread_urgent,
                emergency: model.unread_emergency,
                mentions: model.unread_mentions,
            },
            joined_at: model.joined_at,
        }
    }
}

impl From<UnreadCountModel> for UnreadCounts {
    fn from(model: UnreadCountModel) -> Self {
        UnreadCounts {
            routine: model.routine,
            urgent: model.urgent,
            emergency: model.emergency,
            mentions: model.mentions,
        }
    }
}
