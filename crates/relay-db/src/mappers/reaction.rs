//! Reaction entity <-> model mapper

use relay_core::entities::Reaction;
use relay_core::value_objects::Snowflake;

use crate::models::ReactionModel;

impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            id: Snowflake::new(model.id),
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            emoji: model.emoji,
            created_at: model.created_at,
        }
    }
}
