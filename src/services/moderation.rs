use crate::{
    error::{AppError, AppResult},
    models::{
        user::{self, ban_outcome, BanOutcome},
        User, UserModel,
    },
    services::email::EmailService,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, TransactionTrait};

/// User ban state machine: active -> banned (temporary) -> active via unban,
/// or -> banned (permanent) on re-offense. `ban_count` only ever grows.
pub struct ModerationService {
    db: DatabaseConnection,
}

impl ModerationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Apply one more ban to a user. The matching notification is dispatched
    /// after the transaction commits.
    pub async fn ban(&self, user_id: i32, email_service: &EmailService) -> AppResult<UserModel> {
        let now = chrono::Utc::now().naive_utc();

        let txn = self.db.begin().await?;

        let existing = User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let new_count = existing.ban_count + 1;
        let outcome = ban_outcome(existing.ban_count, now);

        let mut active: user::ActiveModel = existing.into();
        active.ban_count = sea_orm::ActiveValue::Set(new_count);
        active.banned = sea_orm::ActiveValue::Set(true);
        active.ban_start = sea_orm::ActiveValue::Set(Some(now));
        active.ban_end = sea_orm::ActiveValue::Set(match outcome {
            BanOutcome::Temporary(end) => Some(end),
            BanOutcome::Permanent => None,
        });

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        let email = email_service.clone();
        let to = updated.email.clone();
        let username = updated.username.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_ban_notice(outcome, &to, &username).await {
                tracing::warn!("Failed to send ban email to {to}: {e}");
            }
        });

        Ok(updated)
    }

    /// Clear the ban flags unconditionally. `ban_count` is deliberately left
    /// untouched so a later re-offense still escalates to a permanent ban.
    pub async fn unban(&self, user_id: i32, email_service: &EmailService) -> AppResult<UserModel> {
        let txn = self.db.begin().await?;

        let existing = User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.banned = sea_orm::ActiveValue::Set(false);
        active.ban_start = sea_orm::ActiveValue::Set(None);
        active.ban_end = sea_orm::ActiveValue::Set(None);

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        let email = email_service.clone();
        let to = updated.email.clone();
        let username = updated.username.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_ban_lifted(&to, &username).await {
                tracing::warn!("Failed to send unban email to {to}: {e}");
            }
        });

        Ok(updated)
    }
}
