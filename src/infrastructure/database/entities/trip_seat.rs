//! Trip seat entity
//!
//! Per-trip seat inventory. `version` backs the optimistic compare-and-swap
//! used by hold, confirm and release.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_seats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub trip_id: i32,

    /// Seat label ("1A", "2B", ...)
    pub code: String,
    pub row: i32,
    pub column: i32,

    pub is_avail: bool,

    /// AVAILABLE, ONHOLD, PAID, CHECKIN
    pub status: String,

    #[sea_orm(nullable)]
    pub hold_expires_at: Option<DateTimeUtc>,

    pub version: i32,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id"
    )]
    Trip,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
