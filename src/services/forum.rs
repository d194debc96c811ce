use crate::{
    error::{AppError, AppResult},
    models::{subject, Subject, SubjectModel},
    utils::sanitize::sanitize_text,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
};

const MAX_TITLE_LENGTH: usize = 100;

/// Discussion subjects, the top level of the forum.
pub struct ForumService {
    db: DatabaseConnection,
}

impl ForumService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<SubjectModel>, u64)> {
        let paginator = Subject::find()
            .order_by_desc(subject::Column::CreatedAt)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let subjects = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((subjects, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<SubjectModel> {
        Subject::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, author_id: i32, title: &str) -> AppResult<SubjectModel> {
        let title = sanitize_text(title.trim());
        if title.is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AppError::Validation(format!(
                "Title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        let new_subject = subject::ActiveModel {
            title: sea_orm::ActiveValue::Set(title),
            author_id: sea_orm::ActiveValue::Set(author_id),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let subject = new_subject.insert(&self.db).await?;
        Ok(subject)
    }

    /// Admin-only removal. Comments and replies go with the subject through
    /// cascade deletes.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        Subject::delete_by_id(existing.id).exec(&self.db).await?;
        Ok(())
    }
}
