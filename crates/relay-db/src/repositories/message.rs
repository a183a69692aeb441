//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::{Message, MessageRecipient};
use relay_core::traits::{MessageRepository, RepoResult};
use relay_core::value_objects::Snowflake;

use crate::mappers::{annotation_to_str, MessageInsert};
use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, chat_id, sender_id, kind, body, subject, media_url, priority,
                   quoted_message_id, mentioned_user_ids, created_at, deleted_at
            FROM messages
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message, recipients), fields(message_id = %message.id, recipients = recipients.len()))]
    async fn create(
        &self,
        message: &Message,
        recipients: &[MessageRecipient],
    ) -> RepoResult<()> {
        let insert = MessageInsert::new(message);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO messages
                (id, chat_id, sender_id, kind, body, subject, media_url, priority,
                 quoted_message_id, mentioned_user_ids, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(insert.id)
        .bind(insert.chat_id)
        .bind(insert.sender_id)
        .bind(insert.kind)
        .bind(insert.body)
        .bind(insert.subject)
        .bind(insert.media_url)
        .bind(insert.priority)
        .bind(insert.quoted_message_id)
        .bind(&insert.mentioned_user_ids)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for recipient in recipients {
            sqlx::query(
                r#"
                INSERT INTO message_recipients
                    (id, message_id, chat_id, recipient_id, is_read, annotation)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(recipient.id.into_inner())
            .bind(recipient.message_id.into_inner())
            .bind(recipient.chat_id.into_inner())
            .bind(recipient.recipient_id.into_inner())
            .bind(recipient.is_read)
            .bind(recipient.annotation.map(annotation_to_str))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        // A new message is chat activity; surface it in chat ordering
        sqlx::query(
            r#"
            UPDATE chats SET updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(insert.chat_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET deleted_at = NOW(), body = '', subject = NULL, media_url = NULL
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }
        Ok(())
    }
}
