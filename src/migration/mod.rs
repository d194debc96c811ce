use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_admins_table;
mod m20250601_000003_create_subjects_table;
mod m20250601_000004_create_comments_table;
mod m20250601_000005_create_replies_table;
mod m20250601_000006_create_comment_likes_table;
mod m20250601_000007_create_chat_requests_table;
mod m20250601_000008_create_devis_requests_table;
mod m20250601_000009_create_anonymous_visits_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_admins_table::Migration),
            Box::new(m20250601_000003_create_subjects_table::Migration),
            Box::new(m20250601_000004_create_comments_table::Migration),
            Box::new(m20250601_000005_create_replies_table::Migration),
            Box::new(m20250601_000006_create_comment_likes_table::Migration),
            Box::new(m20250601_000007_create_chat_requests_table::Migration),
            Box::new(m20250601_000008_create_devis_requests_table::Migration),
            Box::new(m20250601_000009_create_anonymous_visits_table::Migration),
        ]
    }
}
