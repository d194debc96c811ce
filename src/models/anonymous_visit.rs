use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per distinct anonymous visitor token, used only for aggregate
/// visit counting.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "anonymous_visits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(36))", unique)]
    pub visitor_id: String,
    pub visit_time: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
