//! Schedule leg entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_legs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub schedule_id: i32,

    pub sort: i32,

    /// Legs with the same flag on the same date share one manifest code
    pub is_round: bool,

    pub departure_stop_id: i32,
    pub arrival_stop_id: i32,

    /// Base seat price in minor currency units
    pub price: i64,

    pub vehicle_id: i32,
    pub driver_id: i32,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(has_many = "super::schedule_stop::Entity")]
    Stops,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::schedule_stop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
