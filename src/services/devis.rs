use crate::{
    error::{AppError, AppResult},
    models::{devis_request, DevisRequest, DevisRequestModel, RequestStatus},
    services::email::EmailService,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

pub struct NewDevisRequest {
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub project_type: String,
    pub content: String,
}

/// Quote-request lifecycle. Same status machine as chat requests, but
/// submitted anonymously and without any meeting provisioning.
pub struct DevisService {
    db: DatabaseConnection,
}

impl DevisService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        input: NewDevisRequest,
        email_service: &EmailService,
    ) -> AppResult<DevisRequestModel> {
        let now = chrono::Utc::now().naive_utc();
        let new_request = devis_request::ActiveModel {
            last_name: sea_orm::ActiveValue::Set(input.last_name),
            first_name: sea_orm::ActiveValue::Set(input.first_name),
            phone: sea_orm::ActiveValue::Set(input.phone),
            email: sea_orm::ActiveValue::Set(input.email),
            project_type: sea_orm::ActiveValue::Set(input.project_type),
            content: sea_orm::ActiveValue::Set(input.content),
            status: sea_orm::ActiveValue::Set(RequestStatus::Pending.as_str().to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let request = new_request.insert(&self.db).await?;

        let email = email_service.clone();
        let to = request.email.clone();
        let first_name = request.first_name.clone();
        tokio::spawn(async move {
            if let Err(e) = email.send_devis_received(&to, &first_name).await {
                tracing::warn!("Failed to send devis confirmation to {to}: {e}");
            }
        });

        Ok(request)
    }

    pub async fn validate(&self, id: i32) -> AppResult<DevisRequestModel> {
        self.apply_transition(id, RequestStatus::Validated).await
    }

    pub async fn refuse(&self, id: i32) -> AppResult<DevisRequestModel> {
        self.apply_transition(id, RequestStatus::Refused).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<DevisRequestModel> {
        DevisRequest::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<DevisRequestModel>, u64)> {
        let mut query = DevisRequest::find().order_by_desc(devis_request::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(devis_request::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let requests = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((requests, total))
    }

    async fn apply_transition(
        &self,
        id: i32,
        requested: RequestStatus,
    ) -> AppResult<DevisRequestModel> {
        let txn = self.db.begin().await?;

        let existing = DevisRequest::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let current = RequestStatus::parse(&existing.status)?;
        let next = RequestStatus::transition(current, requested)?;

        let mut active: devis_request::ActiveModel = existing.into();
        active.status = sea_orm::ActiveValue::Set(next.as_str().to_string());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }
}
