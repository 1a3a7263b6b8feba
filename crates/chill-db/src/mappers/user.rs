//! User summary <-> model mapper

use chill_core::entities::UserSummary;
use chill_core::value_objects::UserId;

use crate::models::UserModel;

impl From<UserModel> for UserSummary {
    fn from(model: UserModel) -> Self {
        UserSummary {
            id: UserId::new(model.id),
            username: model.username,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
        }
    }
}
