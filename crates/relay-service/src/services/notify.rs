//! Notification dispatcher
//!
//! Builds push payloads for offline recipients and hands them to the external
//! push collaborator. Delivery is best-effort: failures are logged and
//! swallowed, never surfaced to the sender.

use relay_core::entities::{Chat, ChatMember, MemberFlags, Message, User};
use relay_core::traits::PushPayload;
use relay_core::value_objects::Snowflake;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::presence::PresenceRegistry;

/// Body previews are truncated to this many bytes (on a char boundary)
const PREVIEW_LEN: usize = 100;

/// Placeholder body for media messages
const MEDIA_PREVIEW: &str = "🏞 Image";

/// Notification dispatcher
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
    registry: &'a PresenceRegistry,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext, registry: &'a PresenceRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Dispatch push notifications for a freshly persisted message.
    ///
    /// Targets recipients who are offline, not muted, and hold a registered
    /// push token. The sender never notifies themself. Errors from the
    /// collaborator are logged and swallowed.
    #[instrument(skip(self, chat, message, sender, members), fields(message_id = %message.id))]
    pub async fn notify_new_message(
        &self,
        chat: &Chat,
        message: &Message,
        sender: &User,
        members: &[ChatMember],
    ) -> ServiceResult<()> {
        let tokens = self.push_tokens(members, message.sender_id).await?;
        if tokens.is_empty() {
            debug!(message_id = %message.id, "No push-capable offline recipients");
            return Ok(());
        }

        let payload = PushPayload {
            tokens,
            title: notification_title(chat, sender),
            body: notification_body(chat, message, sender),
            icon_url: sender.avatar_url.clone(),
            deep_link_url: Some(format!("/chat/{}", chat.id)),
        };

        self.dispatch(message.id, &payload).await;
        Ok(())
    }

    /// Dispatch push notifications for a reaction change on a message.
    ///
    /// Same targeting as a new message, except the excluded party is the
    /// reacting user rather than the message sender.
    #[instrument(skip(self, chat, message, actor, members), fields(message_id = %message.id))]
    pub async fn notify_reaction(
        &self,
        chat: &Chat,
        message: &Message,
        actor: &User,
        members: &[ChatMember],
    ) -> ServiceResult<()> {
        let tokens = self.push_tokens(members, actor.id).await?;
        if tokens.is_empty() {
            debug!(message_id = %message.id, "No push-capable offline recipients");
            return Ok(());
        }

        let payload = PushPayload {
            tokens,
            title: notification_title(chat, actor),
            body: reaction_body(actor),
            icon_url: actor.avatar_url.clone(),
            deep_link_url: Some(format!("/chat/{}", chat.id)),
        };

        self.dispatch(message.id, &payload).await;
        Ok(())
    }

    /// Resolve push tokens for members who are offline, not muted, and not
    /// the acting user
    async fn push_tokens(
        &self,
        members: &[ChatMember],
        actor_id: Snowflake,
    ) -> ServiceResult<Vec<String>> {
        let candidate_ids: Vec<Snowflake> = members
            .iter()
            .filter(|m| {
                m.is_active()
                    && !m.flags.contains(MemberFlags::MUTED)
                    && m.user_id != actor_id
                    && !self.registry.is_online(m.user_id)
            })
            .map(|m| m.user_id)
            .collect();

        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.ctx.user_repo().find_by_ids(&candidate_ids).await?;
        Ok(users
            .iter()
            .filter(|u| u.has_push_token())
            .filter_map(|u| u.push_token.clone())
            .collect())
    }

    async fn dispatch(&self, message_id: Snowflake, payload: &PushPayload) {
        if let Err(e) = self.ctx.push_notifier().dispatch(payload).await {
            // Best-effort: the underlying state change is already persisted
            warn!(message_id = %message_id, error = %e, "Push dispatch failed");
        }
    }
}

/// Notification title: chat name for groups, sender name for direct chats
fn notification_title(chat: &Chat, sender: &User) -> String {
    match &chat.name {
        Some(name) if chat.is_group() => name.clone(),
        _ => sender.display_name.clone(),
    }
}

/// Notification body for a reaction change
fn reaction_body(actor: &User) -> String {
    format!("{} reacted to a message", actor.display_name)
}

/// Notification body: media placeholder or truncated text, prefixed with the
/// sender's name in group chats
fn notification_body(chat: &Chat, message: &Message, sender: &User) -> String {
    let preview = if message.is_media() {
        MEDIA_PREVIEW.to_string()
    } else {
        message.preview(PREVIEW_LEN).to_string()
    };

    if chat.is_group() {
        format!("{}: {preview}", sender.display_name)
    } else {
        preview
    }
}
