//! Message fan-out engine
//!
//! One send call runs the full pipeline: authorize, validate, persist
//! transactionally, broadcast to the chat room, bump unread counters, and
//! queue best-effort push notifications. The broadcast is strictly gated on
//! the commit; no failure path ever emits.

use relay_core::entities::{
    ghost_recipients, DeliveryAnnotation, Message, MessageKind, MessageRecipient,
};
use relay_core::value_objects::{RoomKey, Snowflake};
use relay_core::DomainError;
use serde_json::to_value;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{hydrate_message, MessageResponse, SendMessageRequest};
use crate::events;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notify::NotificationService;
use super::presence::PresenceRegistry;

/// Message fan-out engine
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
    registry: &'a PresenceRegistry,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext, registry: &'a PresenceRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Send a message to a chat
    ///
    /// Returns the hydrated payload that was broadcast; the caller acks with
    /// it after this returns.
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id))]
    pub async fn send_message(
        &self,
        sender_id: Snowflake,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        // Authorization before any persistence
        let chat = self
            .ctx
            .chat_repo()
            .find_by_id(request.chat_id)
            .await?
            .ok_or(DomainError::ChatNotFound(request.chat_id))?;

        let members = self.ctx.chat_repo().find_members(chat.id).await?;
        let sender_member = members
            .iter()
            .find(|m| m.user_id == sender_id && m.is_active())
            .ok_or(DomainError::NotAChatMember)?;

        if chat.admin_only_posting && !sender_member.is_admin() {
            return Err(DomainError::AdminOnlyPosting.into());
        }

        // Content validation
        if request.body.trim().is_empty() && request.media_url.is_none() {
            return Err(DomainError::EmptyContent.into());
        }
        if request.kind == MessageKind::Media && request.media_url.is_none() {
            return Err(ServiceError::validation("Media message requires mediaUrl"));
        }

        // Resolve the quote before building the row: a quote into another
        // chat is an error, a dangling quote id is dropped with a warning
        let quoted = match request.quoted_message_id {
            Some(quoted_id) => {
                let found = self.ctx.message_repo().find_by_id(quoted_id).await?;
                match found {
                    Some(q) if q.chat_id != chat.id => {
                        return Err(DomainError::QuoteOutsideChat.into());
                    }
                    Some(q) => Some(q),
                    None => {
                        warn!(quoted_id = %quoted_id, "Dropping dangling quoted message id");
                        None
                    }
                }
            }
            None => None,
        };

        let message = self.build_message(sender_id, &chat.id, &request, quoted.as_ref());

        // Recipient rows for every other active member, ghosts included
        // (silent participants keep their audit trail)
        let recipients: Vec<MessageRecipient> = members
            .iter()
            .filter(|m| m.is_active() && m.user_id != sender_id)
            .map(|m| {
                let row = MessageRecipient::new(
                    self.ctx.generate_id(),
                    message.id,
                    chat.id,
                    m.user_id,
                );
                match annotation_for(&request, m.user_id) {
                    Some(a) => row.with_annotation(a),
                    None => row,
                }
            })
            .collect();

        // One transaction: message + recipient rows + chat activity bump
        self.ctx.message_repo().create(&message, &recipients).await?;

        let recipient_ids: Vec<Snowflake> = recipients.iter().map(|r| r.recipient_id).collect();
        let mentioned: Vec<Snowflake> = message
            .mentioned_user_ids
            .iter()
            .copied()
            .filter(|id| recipient_ids.contains(id))
            .collect();
        self.ctx
            .chat_repo()
            .bump_unread(chat.id, &recipient_ids, message.priority, &mentioned)
            .await?;

        // Hydrate and broadcast, strictly after the commit
        let sender = self
            .ctx
            .user_repo()
            .find_by_id(sender_id)
            .await?
            .ok_or(DomainError::UserNotFound(sender_id))?;
        let response = hydrate_message(&message, &sender, quoted.as_ref());

        let payload = to_value(&response)
            .map_err(|e| ServiceError::internal(format!("Message payload: {e}")))?;
        let exclude = ghost_recipients(&members);
        let reached = self
            .ctx
            .broadcaster()
            .emit_to_room(RoomKey::chat(chat.id), events::NEW_MESSAGE, payload, &exclude)
            .await;

        info!(
            message_id = %message.id,
            chat_id = %chat.id,
            recipients = recipients.len(),
            reached,
            "Message sent"
        );

        // Best-effort push for offline recipients; never fails the send
        if let Err(e) = NotificationService::new(self.ctx, self.registry)
            .notify_new_message(&chat, &message, &sender, &members)
            .await
        {
            warn!(message_id = %message.id, error = %e, "Notification dispatch failed");
        }

        Ok(response)
    }

    fn build_message(
        &self,
        sender_id: Snowflake,
        chat_id: &Snowflake,
        request: &SendMessageRequest,
        quoted: Option<&Message>,
    ) -> Message {
        let mut message = match request.kind {
            MessageKind::Media => Message::new_media(
                self.ctx.generate_id(),
                *chat_id,
                sender_id,
                request.media_url.clone().unwrap_or_default(),
                request.priority,
            ),
            MessageKind::Text => Message::new_text(
                self.ctx.generate_id(),
                *chat_id,
                sender_id,
                request.body.clone(),
                request.priority,
            ),
        };
        if message.is_media() {
            message.body = request.body.clone();
        }
        message.subject = request.subject.clone();
        message.quoted_message_id = quoted.map(|q| q.id);
        message.mentioned_user_ids = request.mentioned_user_ids.clone();
        message
    }
}

/// Cc/bcc annotation requested for one recipient, if any
fn annotation_for(request: &SendMessageRequest, user_id: Snowflake) -> Option<DeliveryAnnotation> {
    if request.bcc.contains(&user_id) {
        Some(DeliveryAnnotation::Bcc)
    } else if request.cc.contains(&user_id) {
        Some(DeliveryAnnotation::Cc)
    } else {
        None
    }
}
