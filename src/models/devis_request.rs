use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A quote (devis) request submitted by a prospective client.
/// Submitted anonymously, so contact details live on the row itself.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "devis_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub last_name: String,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub first_name: String,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub phone: String,
    pub email: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub project_type: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub status: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
