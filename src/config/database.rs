use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Open the connection pool from `DATABASE_URL`, with optional
/// `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS` overrides.
pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_string()))?;

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(env_u32("DB_MAX_CONNECTIONS", 10))
        .min_connections(env_u32("DB_MIN_CONNECTIONS", 2))
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    Database::connect(opt).await
}
