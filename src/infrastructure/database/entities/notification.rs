//! Notification entity
//!
//! In-app notification inbox rows written by the dispatcher. `customer_id`
//! is null for operator-facing notices (maintenance reminders).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(nullable)]
    pub customer_id: Option<i32>,

    pub title: String,
    pub body: String,

    /// DEPARTURE, MAINTENANCE, PAYMENT
    pub kind: String,

    pub is_read: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
