//! Read/unread reconciliation engine
//!
//! Mark-read is a set-based monotonic update: rows flip false→true exactly
//! once, repeat calls are no-ops. The per-chat counters are a cache over the
//! unread recipient rows and can always be recomputed from them.

use relay_core::entities::UnreadCounts;
use relay_core::value_objects::{RoomKey, Snowflake};
use relay_core::DomainError;
use serde_json::to_value;
use tracing::{debug, info, instrument};

use crate::dto::MarkReadResponse;
use crate::events;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome of a mark-read call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// Some rows flipped to read; the count-updated event was broadcast
    Updated(u64),
    /// Nothing was unread; no broadcast
    AlreadySynchronized,
}

/// Read/unread reconciliation engine
pub struct UnreadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UnreadService<'a> {
    /// Create a new UnreadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark every unread message in a chat as read for one user
    ///
    /// Broadcasts `res-mark-read-chat` to the room only when rows actually
    /// changed, so other connected members (including the user's own other
    /// devices) converge without redundant events.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: Snowflake,
        chat_id: Snowflake,
    ) -> ServiceResult<MarkReadOutcome> {
        self.ctx
            .chat_repo()
            .find_member(chat_id, user_id)
            .await?
            .filter(|m| m.is_active())
            .ok_or(DomainError::NotAChatMember)?;

        let updated = self.ctx.recipient_repo().mark_read(chat_id, user_id).await?;
        if updated == 0 {
            debug!(user_id = %user_id, chat_id = %chat_id, "Already synchronized");
            return Ok(MarkReadOutcome::AlreadySynchronized);
        }

        self.ctx.chat_repo().reset_unread(chat_id, user_id).await?;

        let payload = to_value(&MarkReadResponse {
            chat_id,
            user_id,
            updated,
        })
        .map_err(|e| ServiceError::internal(format!("Mark-read payload: {e}")))?;

        self.ctx
            .broadcaster()
            .emit_to_room(RoomKey::chat(chat_id), events::RES_MARK_READ_CHAT, payload, &[])
            .await;

        info!(user_id = %user_id, chat_id = %chat_id, updated, "Chat marked read");
        Ok(MarkReadOutcome::Updated(updated))
    }

    /// Re-derive per-chat unread counts from the unread recipient rows and
    /// overwrite the cached counters (resync path; idempotent)
    #[instrument(skip(self))]
    pub async fn recompute_unread_counts(
        &self,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<(Snowflake, UnreadCounts)>> {
        let counts = self.ctx.recipient_repo().unread_counts(user_id).await?;
        self.ctx
            .chat_repo()
            .write_unread_counts(user_id, &counts)
            .await?;

        debug!(user_id = %user_id, chats = counts.len(), "Unread counters recomputed");
        Ok(counts)
    }
}
