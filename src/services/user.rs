use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
    utils::image::process_profile_photo,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// User profile operations.
pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Validate, thumbnail and store an uploaded profile photo.
    pub async fn set_profile_photo(
        &self,
        user_id: i32,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UserModel> {
        let thumbnail = process_profile_photo(data, content_type)?;

        let existing = self.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.profile_photo = sea_orm::ActiveValue::Set(Some(thumbnail));
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Raw stored thumbnail bytes, if the user has uploaded a photo.
    pub async fn get_profile_photo(&self, user_id: i32) -> AppResult<Vec<u8>> {
        let user = self.get_by_id(user_id).await?;
        user.profile_photo.ok_or(AppError::NotFound)
    }
}
