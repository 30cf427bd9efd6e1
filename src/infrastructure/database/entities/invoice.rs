//! Invoice entity
//!
//! Local mirror of a gateway invoice. `external_ref` is the merchant-side
//! reference echoed back in webhook callbacks; exactly one row per ref.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub external_ref: String,

    pub gateway_invoice_id: String,
    pub payment_url: String,

    /// Last raw gateway status, last-write-wins
    pub raw_status: String,

    /// PAID, EXPIRED, or the uppercased raw status passed through
    pub normalized_status: String,

    #[sea_orm(nullable)]
    pub paid_amount: Option<i64>,

    #[sea_orm(nullable)]
    pub paid_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub payment_method: Option<String>,

    #[sea_orm(nullable)]
    pub payment_channel: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
