use crate::{
    error::{AppError, AppResult},
    models::{admin, user, Admin, Identity, User, UserModel},
    services::email::EmailService,
    utils::{encode_access_token, hash_password, verify_password},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

pub struct NewRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: NaiveDate,
}

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user and send a confirmation email.
    /// Returns (user_model, access_token).
    pub async fn register(
        &self,
        input: NewRegistration,
        email_service: &EmailService,
    ) -> AppResult<(UserModel, String)> {
        if self.user_exists(&input.username, &input.email).await? {
            return Err(AppError::Validation(
                "Username or email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            username: sea_orm::ActiveValue::Set(input.username),
            email: sea_orm::ActiveValue::Set(input.email),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            date_of_birth: sea_orm::ActiveValue::Set(input.date_of_birth),
            profile_photo: sea_orm::ActiveValue::Set(None),
            role: sea_orm::ActiveValue::Set("user".to_string()),
            banned: sea_orm::ActiveValue::Set(false),
            ban_start: sea_orm::ActiveValue::Set(None),
            ban_end: sea_orm::ActiveValue::Set(None),
            ban_count: sea_orm::ActiveValue::Set(0),
            password_reset_token: sea_orm::ActiveValue::Set(None),
            password_reset_expires: sea_orm::ActiveValue::Set(None),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let user = new_user.insert(&self.db).await?;
        let token = encode_access_token(&Identity::User(user.clone()).subject())?;

        let email = email_service.clone();
        let to = user.email.clone();
        let username = user.username.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_registration_confirmation(&to, &username).await {
                tracing::warn!("Failed to send registration email to {to}: {e}");
            }
        });

        Ok((user, token))
    }

    /// Authenticate against the user store first, then the admin store.
    /// Currently banned users cannot log in.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(Identity, String)> {
        if let Some(user) = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        {
            if !verify_password(password, &user.password_hash)? {
                return Err(AppError::Unauthorized);
            }
            let now = chrono::Utc::now().naive_utc();
            if user.is_currently_banned(now) {
                return Err(AppError::Forbidden);
            }
            let identity = Identity::User(user);
            let token = encode_access_token(&identity.subject())?;
            return Ok((identity, token));
        }

        if let Some(admin) = Admin::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await?
        {
            if !verify_password(password, &admin.password_hash)? {
                return Err(AppError::Unauthorized);
            }
            let identity = Identity::Admin(admin);
            let token = encode_access_token(&identity.subject())?;
            return Ok((identity, token));
        }

        Err(AppError::Unauthorized)
    }

    pub async fn get_user_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Change password for an authenticated user.
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get_user_by_id(user_id).await?;
        if !verify_password(current_password, &user.password_hash)? {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        let new_hash = hash_password(new_password)?;
        let mut active: user::ActiveModel = user.into();
        active.password_hash = sea_orm::ActiveValue::Set(new_hash);
        active.update(&self.db).await?;
        Ok(())
    }

    /// Request a password reset. Silently succeeds when the email is unknown
    /// so the endpoint does not reveal which addresses are registered.
    pub async fn forgot_password(
        &self,
        email: &str,
        email_service: &EmailService,
    ) -> AppResult<()> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        let user = match user {
            Some(u) => u,
            None => return Ok(()),
        };

        let token = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().naive_utc();
        let expires = now + chrono::Duration::hours(1);

        let to = user.email.clone();
        let username = user.username.clone();
        let mut active: user::ActiveModel = user.into();
        active.password_reset_token = sea_orm::ActiveValue::Set(Some(token.clone()));
        active.password_reset_expires = sea_orm::ActiveValue::Set(Some(expires));
        active.update(&self.db).await?;

        let mailer = email_service.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset(&to, &username, &token).await {
                tracing::warn!("Failed to send password reset email to {to}: {e}");
            }
        });

        Ok(())
    }

    /// Reset a password using a reset token.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        email_service: &EmailService,
    ) -> AppResult<()> {
        let user = User::find()
            .filter(user::Column::PasswordResetToken.eq(token))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid reset token".to_string()))?;

        if let Some(expires) = user.password_reset_expires {
            if chrono::Utc::now().naive_utc() > expires {
                return Err(AppError::Validation("Reset token has expired".to_string()));
            }
        }

        let new_hash = hash_password(new_password)?;
        let to = user.email.clone();
        let username = user.username.clone();
        let mut active: user::ActiveModel = user.into();
        active.password_hash = sea_orm::ActiveValue::Set(new_hash);
        active.password_reset_token = sea_orm::ActiveValue::Set(None);
        active.password_reset_expires = sea_orm::ActiveValue::Set(None);
        active.update(&self.db).await?;

        let mailer = email_service.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset_success(&to, &username).await {
                tracing::warn!("Failed to send reset confirmation to {to}: {e}");
            }
        });

        Ok(())
    }

    async fn user_exists(&self, username: &str, email: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(
                sea_orm::Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
