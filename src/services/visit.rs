use crate::{
    error::AppResult,
    models::{anonymous_visit, AnonymousVisit},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Anonymous visit tracking: one row per visitor token, refreshed on each
/// visit. Only the aggregate count is ever read back.
pub struct VisitService {
    db: DatabaseConnection,
}

impl VisitService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a visit for a visitor token, creating the row on first sight.
    pub async fn record(&self, visitor_id: &str) -> AppResult<()> {
        let now = chrono::Utc::now().naive_utc();

        let existing = AnonymousVisit::find()
            .filter(anonymous_visit::Column::VisitorId.eq(visitor_id))
            .one(&self.db)
            .await?;

        match existing {
            Some(visit) => {
                let mut active: anonymous_visit::ActiveModel = visit.into();
                active.visit_time = sea_orm::ActiveValue::Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let new_visit = anonymous_visit::ActiveModel {
                    visitor_id: sea_orm::ActiveValue::Set(visitor_id.to_string()),
                    visit_time: sea_orm::ActiveValue::Set(now),
                    ..Default::default()
                };
                new_visit.insert(&self.db).await?;
            }
        }

        Ok(())
    }

    /// Number of distinct visitors seen so far.
    pub async fn count(&self) -> AppResult<u64> {
        let count = AnonymousVisit::find().count(&self.db).await?;
        Ok(count)
    }
}
