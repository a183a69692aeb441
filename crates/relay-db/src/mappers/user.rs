//! User entity <-> model mapper

use relay_core::entities::User;
use relay_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            push_token: model.push_token,
            is_online: model.is_online,
            last_seen_at: model.last_seen_at,
            created_at: model.created_at,
        }
    }
}
