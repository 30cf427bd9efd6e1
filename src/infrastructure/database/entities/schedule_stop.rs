//! Schedule stop entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_stops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub leg_id: i32,
    pub stop_id: i32,

    /// "HH:MM"
    pub depart_time: String,

    pub sort: i32,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule_leg::Entity",
        from = "Column::LegId",
        to = "super::schedule_leg::Column::Id"
    )]
    Leg,
}

impl Related<super::schedule_leg::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leg.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
