use crate::{
    error::{AppError, AppResult},
    models::{
        comment, comment_like, reply, Comment, CommentLike, CommentModel, Reply, ReplyModel,
        Subject,
    },
    utils::sanitize::sanitize_text,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A comment together with its reply thread and like count.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentModel,
    pub replies: Vec<ReplyModel>,
    pub like_count: u64,
}

/// Comments under subjects, replies under comments, and per-user likes.
pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_by_subject(&self, subject_id: i32) -> AppResult<Vec<CommentThread>> {
        // 404 for threads of a subject that does not exist.
        Subject::find_by_id(subject_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let comments = Comment::find()
            .filter(comment::Column::SubjectId.eq(subject_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut threads = Vec::with_capacity(comments.len());
        for comment in comments {
            let replies = Reply::find()
                .filter(reply::Column::CommentId.eq(comment.id))
                .order_by_asc(reply::Column::CreatedAt)
                .all(&self.db)
                .await?;
            let like_count = CommentLike::find()
                .filter(comment_like::Column::CommentId.eq(comment.id))
                .count(&self.db)
                .await?;
            threads.push(CommentThread {
                comment,
                replies,
                like_count,
            });
        }

        Ok(threads)
    }

    pub async fn create(
        &self,
        subject_id: i32,
        user_id: i32,
        content: &str,
    ) -> AppResult<CommentModel> {
        let content = non_empty(content)?;

        Subject::find_by_id(subject_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation("Subject not found".to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let new_comment = comment::ActiveModel {
            subject_id: sea_orm::ActiveValue::Set(subject_id),
            user_id: sea_orm::ActiveValue::Set(user_id),
            content: sea_orm::ActiveValue::Set(content),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let comment = new_comment.insert(&self.db).await?;
        Ok(comment)
    }

    pub async fn update(&self, id: i32, user_id: i32, content: &str) -> AppResult<CommentModel> {
        let content = non_empty(content)?;

        let existing = self.get_by_id(id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        let mut active: comment::ActiveModel = existing.into();
        active.content = sea_orm::ActiveValue::Set(content);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Author may delete their own comment; an admin may delete any.
    pub async fn delete(&self, id: i32, user_id: i32, is_admin: bool) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        if !is_admin && existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Comment::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CommentModel> {
        Comment::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create_reply(
        &self,
        comment_id: i32,
        user_id: i32,
        content: &str,
    ) -> AppResult<ReplyModel> {
        let content = non_empty(content)?;

        Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation("Comment not found".to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let new_reply = reply::ActiveModel {
            comment_id: sea_orm::ActiveValue::Set(comment_id),
            user_id: sea_orm::ActiveValue::Set(user_id),
            content: sea_orm::ActiveValue::Set(content),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let reply = new_reply.insert(&self.db).await?;
        Ok(reply)
    }

    pub async fn update_reply(
        &self,
        id: i32,
        user_id: i32,
        content: &str,
    ) -> AppResult<ReplyModel> {
        let content = non_empty(content)?;

        let existing = self.get_reply_by_id(id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        let mut active: reply::ActiveModel = existing.into();
        active.content = sea_orm::ActiveValue::Set(content);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete_reply(&self, id: i32, user_id: i32, is_admin: bool) -> AppResult<()> {
        let existing = self.get_reply_by_id(id).await?;
        if !is_admin && existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Reply::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn get_reply_by_id(&self, id: i32) -> AppResult<ReplyModel> {
        Reply::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Toggle the caller's like on a comment. Returns (liked, like_count)
    /// after the toggle.
    pub async fn toggle_like(&self, comment_id: i32, user_id: i32) -> AppResult<(bool, u64)> {
        Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let txn = self.db.begin().await?;

        let existing = CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .filter(comment_like::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;

        let liked = match existing {
            Some(like) => {
                CommentLike::delete_by_id(like.id).exec(&txn).await?;
                false
            }
            None => {
                let now = chrono::Utc::now().naive_utc();
                let new_like = comment_like::ActiveModel {
                    comment_id: sea_orm::ActiveValue::Set(comment_id),
                    user_id: sea_orm::ActiveValue::Set(user_id),
                    created_at: sea_orm::ActiveValue::Set(now),
                    ..Default::default()
                };
                new_like.insert(&txn).await?;
                true
            }
        };

        let like_count = CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .count(&txn)
            .await?;
        txn.commit().await?;

        Ok((liked, like_count))
    }
}

fn non_empty(content: &str) -> AppResult<String> {
    let cleaned = sanitize_text(content.trim());
    if cleaned.is_empty() {
        return Err(AppError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    Ok(cleaned)
}
