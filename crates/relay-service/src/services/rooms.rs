//! Room membership resolver
//!
//! Maps users to the chat rooms they may receive broadcasts from, and
//! subscribes connections to rooms after a membership check.

use relay_core::value_objects::{RoomKey, Snowflake};
use relay_core::DomainError;
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Room membership resolver
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Chats where the user is a non-removed member (cold resync path)
    #[instrument(skip(self))]
    pub async fn rooms_for_user(&self, user_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        Ok(self.ctx.chat_repo().chat_ids_for_user(user_id).await?)
    }

    /// Subscribe one connection to every room its user belongs to.
    /// Returns the number of rooms joined.
    #[instrument(skip(self))]
    pub async fn join_all(
        &self,
        connection_id: &str,
        user_id: Snowflake,
    ) -> ServiceResult<usize> {
        let chat_ids = self.rooms_for_user(user_id).await?;
        let mut joined = 0;
        for chat_id in &chat_ids {
            if self
                .ctx
                .broadcaster()
                .join_room(connection_id, RoomKey::chat(*chat_id))
                .await
            {
                joined += 1;
            }
        }

        debug!(user_id = %user_id, joined, "Connection joined all member rooms");
        Ok(joined)
    }

    /// Subscribe one connection to one room after a membership check
    /// (fast path when the client already knows the chat it wants)
    #[instrument(skip(self))]
    pub async fn join_explicit(
        &self,
        connection_id: &str,
        user_id: Snowflake,
        chat_id: Snowflake,
    ) -> ServiceResult<()> {
        let member = self
            .ctx
            .chat_repo()
            .find_member(chat_id, user_id)
            .await?
            .filter(|m| m.is_active())
            .ok_or(DomainError::NotAChatMember)?;

        self.ctx
            .broadcaster()
            .join_room(connection_id, RoomKey::chat(member.chat_id))
            .await;

        debug!(user_id = %user_id, chat_id = %chat_id, "Connection joined room");
        Ok(())
    }
}
