//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::Reaction;
use relay_core::traits::{ReactionRepository, RepoResult};
use relay_core::value_objects::Snowflake;

use crate::models::ReactionModel;

use super::error::{map_db_error, reaction_not_found};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, message_id, user_id, emoji, created_at
            FROM reactions
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reaction::from))
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, message_id, user_id, emoji, created_at
            FROM reactions
            WHERE message_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Reaction::from).collect())
    }

    #[instrument(skip(self, reaction), fields(message_id = %reaction.message_id, user_id = %reaction.user_id))]
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        // One reaction per (message, user): a repeat replaces the emoji
        sqlx::query(
            r#"
            INSERT INTO reactions (id, message_id, user_id, emoji, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (message_id, user_id)
            DO UPDATE SET emoji = EXCLUDED.emoji, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(reaction.id.into_inner())
        .bind(reaction.message_id.into_inner())
        .bind(reaction.user_id.into_inner())
        .bind(&reaction.emoji)
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM reactions WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(reaction_not_found(id));
        }
        Ok(())
    }
}
