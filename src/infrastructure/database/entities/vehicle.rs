//! Vehicle entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub plate_number: String,
    pub capacity: i32,

    pub odometer_km: i64,

    #[sea_orm(nullable)]
    pub service_interval_km: Option<i64>,

    /// Highest odometer service cycle already notified (0 = never)
    pub service_cycle_notified: i64,

    #[sea_orm(nullable)]
    pub inspection_due: Option<Date>,

    #[sea_orm(nullable)]
    pub registration_due: Option<Date>,

    /// Due date the last inspection reminder was sent for
    #[sea_orm(nullable)]
    pub inspection_notified_for: Option<Date>,

    /// Due date the last registration reminder was sent for
    #[sea_orm(nullable)]
    pub registration_notified_for: Option<Date>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vehicle_seat::Entity")]
    VehicleSeats,
}

impl Related<super::vehicle_seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleSeats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
