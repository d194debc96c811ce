use crate::{
    error::{AppError, AppResult},
    models::{
        chat_request, Admin, ChatRequest, ChatRequestModel, RequestStatus, User, UserModel,
    },
    services::{email::EmailService, meeting::MeetingService},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

pub struct NewChatRequest {
    pub content: String,
    pub requested_date: NaiveDate,
    pub requested_time: NaiveTime,
    pub attachment: Option<String>,
}

/// Video-chat appointment request lifecycle.
///
/// Requests are created pending and owned by the site admin; `validate` and
/// `refuse` are the only transitions, both terminal. All notifications are
/// dispatched after the owning transaction commits.
pub struct ChatRequestService {
    db: DatabaseConnection,
}

impl ChatRequestService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a pending request, emailing a confirmation to the requester and
    /// an alert to the owning admin.
    pub async fn create(
        &self,
        requester: &UserModel,
        input: NewChatRequest,
        email_service: &EmailService,
    ) -> AppResult<ChatRequestModel> {
        // Every chat request is owned by an admin from the moment it exists.
        let admin = Admin::find()
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation("No administrator is registered".to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let new_request = chat_request::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(requester.id),
            admin_id: sea_orm::ActiveValue::Set(admin.id),
            content: sea_orm::ActiveValue::Set(input.content),
            requested_date: sea_orm::ActiveValue::Set(input.requested_date),
            requested_time: sea_orm::ActiveValue::Set(input.requested_time),
            attachment: sea_orm::ActiveValue::Set(input.attachment),
            status: sea_orm::ActiveValue::Set(RequestStatus::Pending.as_str().to_string()),
            admin_slots: sea_orm::ActiveValue::Set(None),
            confirmed_slot: sea_orm::ActiveValue::Set(None),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let request = new_request.insert(&self.db).await?;

        let email = email_service.clone();
        let requester_email = requester.email.clone();
        let requester_name = requester.username.clone();
        let admin_email = admin.email.clone();
        let requested_at = format_slot(request.requested_date, request.requested_time);
        let attachment = request.attachment.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_chat_request_received(&requester_email, &requester_name)
                .await
            {
                tracing::warn!("Failed to send request confirmation to {requester_email}: {e}");
            }
            if let Some(admin_email) = admin_email {
                if let Err(e) = email
                    .send_chat_request_alert(
                        &admin_email,
                        &requester_name,
                        &requested_at,
                        attachment.as_deref(),
                    )
                    .await
                {
                    tracing::warn!("Failed to send admin alert to {admin_email}: {e}");
                }
            }
        });

        Ok(request)
    }

    /// Validate a pending request: commit the transition first, then try to
    /// mint a meeting link, then notify the requester (link or not).
    pub async fn validate(
        &self,
        request_id: i32,
        meeting_service: &MeetingService,
        email_service: &EmailService,
    ) -> AppResult<ChatRequestModel> {
        let updated = self
            .apply_transition(request_id, RequestStatus::Validated)
            .await?;

        let requester = self.requester_of(&updated).await?;

        // The meeting call happens strictly after the status commit: a slow
        // or failing provider leaves the request validated with no link.
        let meeting_link = meeting_service.provision_meeting().await;

        let scheduled_at = updated
            .confirmed_slot
            .map(format_datetime)
            .unwrap_or_else(|| format_slot(updated.requested_date, updated.requested_time));

        let email = email_service.clone();
        let to = requester.email.clone();
        let username = requester.username.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_chat_request_validated(&to, &username, &scheduled_at, meeting_link.as_deref())
                .await
            {
                tracing::warn!("Failed to send validation email to {to}: {e}");
            }
        });

        Ok(updated)
    }

    /// Refuse a pending request and invite the requester to resubmit.
    pub async fn refuse(
        &self,
        request_id: i32,
        email_service: &EmailService,
    ) -> AppResult<ChatRequestModel> {
        let updated = self
            .apply_transition(request_id, RequestStatus::Refused)
            .await?;

        let requester = self.requester_of(&updated).await?;

        let email = email_service.clone();
        let to = requester.email.clone();
        let username = requester.username.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_chat_request_refused(&to, &username).await {
                tracing::warn!("Failed to send refusal email to {to}: {e}");
            }
        });

        Ok(updated)
    }

    /// Record alternative slots proposed by the admin on a pending request.
    pub async fn propose_slots(
        &self,
        request_id: i32,
        slots: Vec<String>,
    ) -> AppResult<ChatRequestModel> {
        if slots.is_empty() {
            return Err(AppError::Validation(
                "At least one alternative slot is required".to_string(),
            ));
        }
        for slot in &slots {
            parse_slot(slot)?;
        }

        let txn = self.db.begin().await?;
        let existing = Self::find_in(&txn, request_id).await?;

        let status = RequestStatus::parse(&existing.status)?;
        if status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Request is already {status}"
            )));
        }

        let mut active: chat_request::ActiveModel = existing.into();
        active.admin_slots = sea_orm::ActiveValue::Set(Some(serde_json::json!(slots)));
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Let the requester pick one of the admin-proposed slots.
    pub async fn confirm_slot(
        &self,
        request_id: i32,
        user_id: i32,
        slot: &str,
    ) -> AppResult<ChatRequestModel> {
        let chosen = parse_slot(slot)?;

        let txn = self.db.begin().await?;
        let existing = Self::find_in(&txn, request_id).await?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        let status = RequestStatus::parse(&existing.status)?;
        if status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Request is already {status}"
            )));
        }

        let proposed: Vec<String> = existing
            .admin_slots
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        if !proposed.iter().any(|s| s == slot) {
            return Err(AppError::Validation(
                "Chosen slot is not among the proposed alternatives".to_string(),
            ));
        }

        let mut active: chat_request::ActiveModel = existing.into();
        active.confirmed_slot = sea_orm::ActiveValue::Set(Some(chosen));
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ChatRequestModel> {
        ChatRequest::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ChatRequestModel>> {
        let requests = ChatRequest::find()
            .filter(chat_request::Column::UserId.eq(user_id))
            .order_by_desc(chat_request::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(requests)
    }

    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ChatRequestModel>, u64)> {
        let mut query = ChatRequest::find().order_by_desc(chat_request::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(chat_request::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let requests = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((requests, total))
    }

    /// Re-read the row inside a transaction, validate the transition against
    /// the status actually stored, and persist the new status. Concurrent
    /// validations therefore race to a single winner; the loser gets a
    /// conflict instead of silently overwriting.
    async fn apply_transition(
        &self,
        request_id: i32,
        requested: RequestStatus,
    ) -> AppResult<ChatRequestModel> {
        let txn = self.db.begin().await?;
        let existing = Self::find_in(&txn, request_id).await?;

        let current = RequestStatus::parse(&existing.status)?;
        let next = RequestStatus::transition(current, requested)?;

        let mut active: chat_request::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(next.as_str().to_string());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    async fn find_in<C: sea_orm::ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> AppResult<ChatRequestModel> {
        ChatRequest::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn requester_of(&self, request: &ChatRequestModel) -> AppResult<UserModel> {
        User::find_by_id(request.user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

fn format_slot(date: NaiveDate, time: NaiveTime) -> String {
    format!("{} {}", date.format("%Y-%m-%d"), time.format("%H:%M"))
}

fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

fn parse_slot(slot: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(slot, "%Y-%m-%d %H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid slot '{slot}', expected YYYY-MM-DD HH:MM")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_parses_expected_format() {
        let parsed = parse_slot("2025-06-01 14:00").unwrap();
        assert_eq!(format_datetime(parsed), "2025-06-01 14:00");
    }

    #[test]
    fn slot_rejects_other_formats() {
        assert!(parse_slot("01/06/2025 14h").is_err());
        assert!(parse_slot("2025-06-01T14:00:00Z").is_err());
        assert!(parse_slot("").is_err());
    }

    #[test]
    fn format_slot_combines_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(format_slot(date, time), "2025-06-01 14:00");
    }
}
