//! PostgreSQL implementation of RecipientRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::{MessageRecipient, UnreadCounts};
use relay_core::traits::{RecipientRepository, RepoResult};
use relay_core::value_objects::Snowflake;

use crate::models::{RecipientModel, UnreadCountModel};

use super::error::map_db_error;

/// PostgreSQL implementation of RecipientRepository
#[derive(Clone)]
pub struct PgRecipientRepository {
    pool: PgPool,
}

impl PgRecipientRepository {
    /// Create a new PgRecipientRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientRepository for PgRecipientRepository {
    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<MessageRecipient>> {
        let results = sqlx::query_as::<_, RecipientModel>(
            r#"
            SELECT id, message_id, chat_id, recipient_id, is_read, annotation, read_at
            FROM message_recipients
            WHERE message_id = $1
            ORDER BY id
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MessageRecipient::from).collect())
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, chat_id: Snowflake, user_id: Snowflake) -> RepoResult<u64> {
        // The is_read guard makes repeat calls no-ops and read_at immutable
        let result = sqlx::query(
            r#"
            UPDATE message_recipients
            SET is_read = TRUE, read_at = NOW()
            WHERE chat_id = $1 AND recipient_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn unread_counts(
        &self,
        user_id: Snowflake,
    ) -> RepoResult<Vec<(Snowflake, UnreadCounts)>> {
        let results = sqlx::query_as::<_, UnreadCountModel>(
            r#"
            SELECT mr.chat_id,
                   COUNT(*) FILTER (WHERE m.priority = 'routine')   AS routine,
                   COUNT(*) FILTER (WHERE m.priority = 'urgent')    AS urgent,
                   COUNT(*) FILTER (WHERE m.priority = 'emergency') AS emergency,
                   COUNT(*) FILTER (WHERE mr.recipient_id = ANY(m.mentioned_user_ids)) AS mentions
            FROM message_recipients mr
            JOIN messages m ON m.id = mr.message_id
            WHERE mr.recipient_id = $1 AND mr.is_read = FALSE AND m.deleted_at IS NULL
            GROUP BY mr.chat_id
            ORDER BY mr.chat_id
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|row| (Snowflake::new(row.chat_id), UnreadCounts::from(row)))
            .collect())
    }
}
