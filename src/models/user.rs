use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_of_birth: Date,
    #[serde(skip_serializing)]
    #[sea_orm(column_type = "VarBinary(StringLen::None)", nullable)]
    #[schema(value_type = Option<String>)]
    pub profile_photo: Option<Vec<u8>>,
    pub role: String,
    pub banned: bool,
    pub ban_start: Option<DateTime>,
    pub ban_end: Option<DateTime>,
    pub ban_count: i32,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Temporary bans last one week.
pub const TEMPORARY_BAN_DAYS: i64 = 7;

/// Number of bans at which a ban becomes permanent.
pub const PERMANENT_BAN_THRESHOLD: i32 = 2;

/// Outcome of applying one more ban to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanOutcome {
    /// 7-day ban ending at the contained time.
    Temporary(NaiveDateTime),
    /// No expiry (`ban_end` stays NULL).
    Permanent,
}

/// Compute the effect of one more ban given the count *before* this ban.
pub fn ban_outcome(prior_ban_count: i32, now: NaiveDateTime) -> BanOutcome {
    if prior_ban_count + 1 >= PERMANENT_BAN_THRESHOLD {
        BanOutcome::Permanent
    } else {
        BanOutcome::Temporary(now + chrono::Duration::days(TEMPORARY_BAN_DAYS))
    }
}

impl Model {
    /// Lazy ban check: the stored `banned` flag is never cleared when a
    /// temporary ban expires, so expiry is only visible through this method.
    /// A NULL `ban_end` on a banned user means a permanent ban.
    pub fn is_currently_banned(&self, now: NaiveDateTime) -> bool {
        if !self.banned {
            return false;
        }
        match self.ban_end {
            Some(end) => now < end,
            None => true,
        }
    }
}
