//! Order item entity
//!
//! One seat per item, passenger details snapshotted at booking time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub order_id: i32,
    pub seat_id: i32,

    pub passenger_name: String,

    #[sea_orm(nullable)]
    pub passenger_phone: Option<String>,

    #[sea_orm(nullable)]
    pub passenger_address: Option<String>,

    /// Minor currency units
    pub price: i64,
    pub discount: i64,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::trip_seat::Entity",
        from = "Column::SeatId",
        to = "super::trip_seat::Column::Id"
    )]
    Seat,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::trip_seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
