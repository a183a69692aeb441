//! Entity -> response DTO mappers

use relay_core::entities::{Message, Reaction, User};

use super::responses::{
    MessageResponse, QuotedMessageResponse, ReactionResponse, SenderResponse,
};

/// Quoted snapshots carry a short excerpt, not the full body
const QUOTE_PREVIEW_LEN: usize = 120;

impl From<&User> for SenderResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl From<&Message> for QuotedMessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            kind: message.kind,
            body: message.preview(QUOTE_PREVIEW_LEN).to_string(),
            deleted: message.is_deleted(),
        }
    }
}

impl From<Reaction> for ReactionResponse {
    fn from(reaction: Reaction) -> Self {
        Self {
            id: reaction.id,
            message_id: reaction.message_id,
            user_id: reaction.user_id,
            emoji_code: reaction.emoji,
            created_at: reaction.created_at,
        }
    }
}

/// Build the hydrated message payload from the persisted message, the
/// sender's display metadata, and the optional quoted message snapshot
pub fn hydrate_message(
    message: &Message,
    sender: &User,
    quoted: Option<&Message>,
) -> MessageResponse {
    MessageResponse {
        id: message.id,
        chat_id: message.chat_id,
        sender: SenderResponse::from(sender),
        kind: message.kind,
        body: message.body.clone(),
        subject: message.subject.clone(),
        media_url: message.media_url.clone(),
        priority: message.priority,
        quoted_message: quoted.map(QuotedMessageResponse::from),
        mentioned_user_ids: message.mentioned_user_ids.clone(),
        created_at: message.created_at,
    }
}
