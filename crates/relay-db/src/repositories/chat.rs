//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::{Chat, ChatMember, MemberFlags, UnreadCounts};
use relay_core::traits::{ChatRepository, RepoResult};
use relay_core::value_objects::{Priority, Snowflake};

use crate::models::{ChatMemberModel, ChatModel};

use super::error::map_db_error;

/// Counter column for one priority class
fn unread_column(priority: Priority) -> &'static str {
    match priority {
        Priority::Routine => "unread_routine",
        Priority::Urgent => "unread_urgent",
        Priority::Emergency => "unread_emergency",
    }
}

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Chat>> {
        let result = sqlx::query_as::<_, ChatModel>(
            r#"
            SELECT id, kind, name, admin_only_posting,
                   routine_threshold_mins, urgent_threshold_mins, emergency_threshold_mins,
                   created_at, updated_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chat::from))
    }

    #[instrument(skip(self))]
    async fn find_members(&self, chat_id: Snowflake) -> RepoResult<Vec<ChatMember>> {
        let results = sqlx::query_as::<_, ChatMemberModel>(
            r#"
            SELECT chat_id, user_id, flags,
                   unread_routine, unread_urgent, unread_emergency, unread_mentions,
                   joined_at
            FROM chat_members
            WHERE chat_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(chat_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ChatMember::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_member(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChatMember>> {
        let result = sqlx::query_as::<_, ChatMemberModel>(
            r#"
            SELECT chat_id, user_id, flags,
                   unread_routine, unread_urgent, unread_emergency, unread_mentions,
                   joined_at
            FROM chat_members
            WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatMember::from))
    }

    #[instrument(skip(self))]
    async fn chat_ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT chat_id
            FROM chat_members
            WHERE user_id = $1 AND (flags & $2) = 0
            ORDER BY chat_id
            "#,
        )
        .bind(user_id.into_inner())
        .bind(MemberFlags::REMOVED.bits())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn update_member_flags(
        &self,
        chat_id: Snowflake,
        user_id: Snowflake,
        flags: MemberFlags,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE chat_members SET flags = $3 WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .bind(flags.bits())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, recipient_ids, mentioned_ids), fields(recipients = recipient_ids.len()))]
    async fn bump_unread(
        &self,
        chat_id: Snowflake,
        recipient_ids: &[Snowflake],
        priority: Priority,
        mentioned_ids: &[Snowflake],
    ) -> RepoResult<()> {
        if recipient_ids.is_empty() {
            return Ok(());
        }

        let raw_recipients: Vec<i64> = recipient_ids
            .iter()
            .copied()
            .map(Snowflake::into_inner)
            .collect();
        let raw_mentioned: Vec<i64> = mentioned_ids
            .iter()
            .copied()
            .map(Snowflake::into_inner)
            .collect();

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Column is selected from a fixed set, never from input
        let column = unread_column(priority);
        let bump = format!(
            "UPDATE chat_members SET {column} = {column} + 1 \
             WHERE chat_id = $1 AND user_id = ANY($2)"
        );
        sqlx::query(&bump)
            .bind(chat_id.into_inner())
            .bind(&raw_recipients)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if !raw_mentioned.is_empty() {
            sqlx::query(
                r#"
                UPDATE chat_members SET unread_mentions = unread_mentions + 1
                WHERE chat_id = $1 AND user_id = ANY($2)
                "#,
            )
            .bind(chat_id.into_inner())
            .bind(&raw_mentioned)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reset_unread(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE chat_members
            SET unread_routine = 0, unread_urgent = 0, unread_emergency = 0, unread_mentions = 0
            WHERE chat_id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, counts), fields(chats = counts.len()))]
    async fn write_unread_counts(
        &self,
        user_id: Snowflake,
        counts: &[(Snowflake, UnreadCounts)],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Zero everything first so chats with no unread rows are corrected too
        sqlx::query(
            r#"
            UPDATE chat_members
            SET unread_routine = 0, unread_urgent = 0, unread_emergency = 0, unread_mentions = 0
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for (chat_id, c) in counts {
            sqlx::query(
                r#"
                UPDATE chat_members
                SET unread_routine = $3, unread_urgent = $4,
                    unread_emergency = $5, unread_mentions = $6
                WHERE chat_id = $1 AND user_id = $2
                "#,
            )
            .bind(chat_id.into_inner())
            .bind(user_id.into_inner())
            .bind(c.routine)
            .bind(c.urgent)
            .bind(c.emergency)
            .bind(c.mentions)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}
