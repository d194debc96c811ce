use crate::{
    error::{AppError, AppResult},
    models::{
        chat_request, devis_request, user, ChatRequest, Comment, DevisRequest, Reply, RequestStatus,
        Subject, User, UserModel,
    },
    services::visit::VisitService,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_users: u64,
    pub banned_users: u64,
    pub total_subjects: u64,
    pub total_comments: u64,
    pub total_replies: u64,
    pub pending_chat_requests: u64,
    pub pending_devis_requests: u64,
    pub total_visits: u64,
}

/// Backend dashboard operations.
pub struct AdminService {
    db: DatabaseConnection,
}

impl AdminService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_stats(&self) -> AppResult<AdminStats> {
        let total_users = User::find().count(&self.db).await?;
        let banned_users = User::find()
            .filter(user::Column::Banned.eq(true))
            .count(&self.db)
            .await?;
        let total_subjects = Subject::find().count(&self.db).await?;
        let total_comments = Comment::find().count(&self.db).await?;
        let total_replies = Reply::find().count(&self.db).await?;

        let pending_chat_requests = ChatRequest::find()
            .filter(chat_request::Column::Status.eq(RequestStatus::Pending.as_str()))
            .count(&self.db)
            .await?;
        let pending_devis_requests = DevisRequest::find()
            .filter(devis_request::Column::Status.eq(RequestStatus::Pending.as_str()))
            .count(&self.db)
            .await?;

        let total_visits = VisitService::new(self.db.clone()).count().await?;

        Ok(AdminStats {
            total_users,
            banned_users,
            total_subjects,
            total_comments,
            total_replies,
            pending_chat_requests,
            pending_devis_requests,
            total_visits,
        })
    }

    pub async fn list_users(&self, page: u64, per_page: u64) -> AppResult<(Vec<UserModel>, u64)> {
        let paginator = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((users, total))
    }

    pub async fn get_user(&self, user_id: i32) -> AppResult<UserModel> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        self.get_user(user_id).await?;
        User::delete_by_id(user_id).exec(&self.db).await?;
        Ok(())
    }
}
