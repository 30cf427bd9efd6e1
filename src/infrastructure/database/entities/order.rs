//! Order entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub code: String,

    pub customer_id: i32,
    pub trip_id: i32,

    #[sea_orm(nullable)]
    pub invoice_id: Option<i32>,

    /// Minor currency units
    pub total: i64,
    pub discount: i64,
    pub subtotal: i64,

    /// PENDING, PAID, CANCELED, EXPIRED
    pub status: String,

    #[sea_orm(nullable)]
    pub canceled_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub cancel_reason: Option<String>,

    #[sea_orm(nullable)]
    pub refund_bank_code: Option<String>,

    #[sea_orm(nullable)]
    pub refund_account_name: Option<String>,

    #[sea_orm(nullable)]
    pub refund_account_number: Option<String>,

    /// NONE, SETTLED, FAILED
    pub disbursement_status: String,

    /// Raw gateway disbursement response, kept for audit
    #[sea_orm(nullable)]
    pub disbursement_response: Option<String>,

    /// Departure-reminder watermark
    #[sea_orm(nullable)]
    pub last_reminded_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
