use crate::error::AppResult;
use crate::models::{admin, Admin};
use crate::utils::hash_password;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use std::env;

#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl BootstrapAdminConfig {
    pub fn from_env() -> Option<Self> {
        let enabled = env::var("BOOTSTRAP_ADMIN_ENABLED")
            .ok()
            .map(|v| v.trim().to_ascii_lowercase())
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on"))
            .unwrap_or(false);

        if !enabled {
            return None;
        }

        Some(Self {
            username: env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?,
            email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?,
            password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?,
        })
    }
}

/// Seed the admin store at startup. Chat requests cannot be created while no
/// admin exists, so a fresh deployment needs this (or a manual insert) before
/// the site is usable.
///
/// Does nothing when disabled or when any admin row already exists.
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection) -> AppResult<()> {
    let Some(cfg) = BootstrapAdminConfig::from_env() else {
        return Ok(());
    };

    let admin_count = Admin::find().count(db).await?;
    if admin_count > 0 {
        return Ok(());
    }

    let password_hash = hash_password(&cfg.password)?;

    let new_admin = admin::ActiveModel {
        username: sea_orm::ActiveValue::Set(cfg.username.clone()),
        email: sea_orm::ActiveValue::Set(Some(cfg.email)),
        role: sea_orm::ActiveValue::Set("admin".to_string()),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        profile_photo: sea_orm::ActiveValue::Set(None),
        ..Default::default()
    };

    new_admin.insert(db).await?;
    tracing::info!("Bootstrap admin '{}' created", cfg.username);
    Ok(())
}
