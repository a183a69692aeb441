//! Reaction dispatcher
//!
//! Reactions are upserts keyed on (message, user): a repeat reaction from the
//! same user replaces the emoji. Every state change broadcasts the full
//! recomputed reaction list so clients converge without diffing, then queues
//! a best-effort push for offline recipients.

use relay_core::entities::{ghost_recipients, Reaction};
use relay_core::value_objects::{RoomKey, Snowflake};
use relay_core::DomainError;
use serde_json::to_value;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    CreateReactionRequest, DeleteReactionRequest, MessageReactionsResponse, ReactionResponse,
};
use crate::events;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notify::NotificationService;
use super::presence::PresenceRegistry;

/// Reaction dispatcher
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
    registry: &'a PresenceRegistry,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext, registry: &'a PresenceRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Set (create or replace) the caller's reaction on a message
    #[instrument(skip(self, request), fields(message_id = %request.message_id))]
    pub async fn set_reaction(
        &self,
        user_id: Snowflake,
        request: CreateReactionRequest,
    ) -> ServiceResult<MessageReactionsResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let message = self
            .authorize(user_id, request.chat_id, request.message_id)
            .await?;

        let reaction = Reaction::new(
            self.ctx.generate_id(),
            message.id,
            user_id,
            request.emoji_code,
        );
        self.ctx.reaction_repo().upsert(&reaction).await?;

        let response = self.broadcast_reactions(request.chat_id, message.id).await?;
        self.dispatch_push(user_id, request.chat_id, &message).await;
        info!(message_id = %message.id, user_id = %user_id, "Reaction set");
        Ok(response)
    }

    /// Remove one of the caller's reactions
    #[instrument(skip(self, request), fields(reaction_id = %request.reaction_id))]
    pub async fn remove_reaction(
        &self,
        user_id: Snowflake,
        request: DeleteReactionRequest,
    ) -> ServiceResult<MessageReactionsResponse> {
        let message = self
            .authorize(user_id, request.chat_id, request.message_id)
            .await?;

        let reaction = self
            .ctx
            .reaction_repo()
            .find_by_id(request.reaction_id)
            .await?
            .ok_or(DomainError::ReactionNotFound(request.reaction_id))?;

        if reaction.user_id != user_id {
            return Err(DomainError::NotReactionOwner.into());
        }
        if reaction.message_id != message.id {
            return Err(ServiceError::validation(
                "Reaction does not belong to this message",
            ));
        }

        self.ctx.reaction_repo().delete(reaction.id).await?;

        let response = self.broadcast_reactions(request.chat_id, message.id).await?;
        self.dispatch_push(user_id, request.chat_id, &message).await;
        info!(message_id = %message.id, user_id = %user_id, "Reaction removed");
        Ok(response)
    }

    /// Best-effort push for a reaction change; never fails the operation
    async fn dispatch_push(
        &self,
        actor_id: Snowflake,
        chat_id: Snowflake,
        message: &relay_core::Message,
    ) {
        let result: ServiceResult<()> = async {
            let chat = self
                .ctx
                .chat_repo()
                .find_by_id(chat_id)
                .await?
                .ok_or(DomainError::ChatNotFound(chat_id))?;
            let actor = self
                .ctx
                .user_repo()
                .find_by_id(actor_id)
                .await?
                .ok_or(DomainError::UserNotFound(actor_id))?;
            let members = self.ctx.chat_repo().find_members(chat_id).await?;

            NotificationService::new(self.ctx, self.registry)
                .notify_reaction(&chat, message, &actor, &members)
                .await
        }
        .await;

        if let Err(e) = result {
            warn!(message_id = %message.id, error = %e, "Reaction notification dispatch failed");
        }
    }

    /// Membership and message checks shared by both operations
    async fn authorize(
        &self,
        user_id: Snowflake,
        chat_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<relay_core::Message> {
        self.ctx
            .chat_repo()
            .find_member(chat_id, user_id)
            .await?
            .filter(|m| m.is_active())
            .ok_or(DomainError::NotAChatMember)?;

        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.chat_id != chat_id {
            return Err(ServiceError::validation(
                "Message does not belong to this chat",
            ));
        }

        Ok(message)
    }

    /// Recompute the full reaction list and broadcast it to the room
    async fn broadcast_reactions(
        &self,
        chat_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<MessageReactionsResponse> {
        let reactions = self.ctx.reaction_repo().find_by_message(message_id).await?;
        let response = MessageReactionsResponse {
            chat_id,
            message_id,
            reactions: reactions.into_iter().map(ReactionResponse::from).collect(),
        };

        let members = self.ctx.chat_repo().find_members(chat_id).await?;
        let exclude = ghost_recipients(&members);
        let payload = to_value(&response)
            .map_err(|e| ServiceError::internal(format!("Reaction payload: {e}")))?;

        self.ctx
            .broadcaster()
            .emit_to_room(
                RoomKey::chat(chat_id),
                events::UPDATE_REALTIME_MESSAGE,
                payload,
                &exclude,
            )
            .await;

        Ok(response)
    }
}
