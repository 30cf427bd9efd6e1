//! Trip entity
//!
//! Denormalized snapshot of one sellable stop-pair on one date. Stop,
//! vehicle and driver names are copied in at generation time so later
//! master-data edits never rewrite sold inventory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub code: String,

    /// Manifest code shared by same-direction legs on the same date
    pub spj_code: String,

    pub route_id: i32,
    pub date: Date,
    pub sort: i32,

    pub departure_stop_id: i32,
    pub departure_stop_name: String,
    pub departure_city: String,

    pub arrival_stop_id: i32,
    pub arrival_stop_name: String,
    pub arrival_city: String,

    /// "HH:MM"
    pub departure_time: String,
    pub arrival_time: String,

    pub duration_hours: i64,

    pub capacity: i32,
    pub ticket_sold: i32,

    /// Minor currency units
    pub base_price: i64,

    pub vehicle_id: i32,
    pub vehicle_name: String,
    pub plate_number: String,

    pub driver_id: i32,
    pub driver_code: String,
    pub driver_name: String,

    /// PENDING, ONGOING, COMPLETED, CANCELLED
    pub status: String,

    #[sea_orm(nullable)]
    pub actual_departure_at: Option<DateTimeUtc>,

    #[sea_orm(nullable)]
    pub actual_arrival_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip_seat::Entity")]
    Seats,
    #[sea_orm(has_many = "super::trip_point::Entity")]
    Points,
}

impl Related<super::trip_seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seats.def()
    }
}

impl Related<super::trip_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Points.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
