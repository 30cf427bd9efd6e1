//! Create schedule template tables
//!
//! One schedule row per (route, weekday), legs per direction/segment, and
//! the ordered stop list of each leg with departure times.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_stops::Stops;
use super::m20250301_000002_create_fleet::{Drivers, Vehicles};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::RouteId).integer().not_null())
                    .col(ColumnDef::new(Schedules::Weekday).integer().not_null())
                    .col(
                        ColumnDef::new(Schedules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Schedules::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_route_weekday")
                    .table(Schedules::Table)
                    .col(Schedules::RouteId)
                    .col(Schedules::Weekday)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduleLegs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleLegs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScheduleLegs::ScheduleId).integer().not_null())
                    .col(
                        ColumnDef::new(ScheduleLegs::Sort)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScheduleLegs::IsRound)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScheduleLegs::DepartureStopId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleLegs::ArrivalStopId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleLegs::Price).big_integer().not_null())
                    .col(ColumnDef::new(ScheduleLegs::VehicleId).integer().not_null())
                    .col(ColumnDef::new(ScheduleLegs::DriverId).integer().not_null())
                    .col(
                        ColumnDef::new(ScheduleLegs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_legs_schedule")
                            .from(ScheduleLegs::Table, ScheduleLegs::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_legs_vehicle")
                            .from(ScheduleLegs::Table, ScheduleLegs::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_legs_driver")
                            .from(ScheduleLegs::Table, ScheduleLegs::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_legs_schedule")
                    .table(ScheduleLegs::Table)
                    .col(ScheduleLegs::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduleStops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleStops::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScheduleStops::LegId).integer().not_null())
                    .col(ColumnDef::new(ScheduleStops::StopId).integer().not_null())
                    .col(ColumnDef::new(ScheduleStops::DepartTime).string().not_null())
                    .col(
                        ColumnDef::new(ScheduleStops::Sort)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScheduleStops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_stops_leg")
                            .from(ScheduleStops::Table, ScheduleStops::LegId)
                            .to(ScheduleLegs::Table, ScheduleLegs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_stops_stop")
                            .from(ScheduleStops::Table, ScheduleStops::StopId)
                            .to(Stops::Table, Stops::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_stops_leg")
                    .table(ScheduleStops::Table)
                    .col(ScheduleStops::LegId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduleStops::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduleLegs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Schedules {
    Table,
    Id,
    RouteId,
    Weekday,
    IsActive,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub enum ScheduleLegs {
    Table,
    Id,
    ScheduleId,
    Sort,
    IsRound,
    DepartureStopId,
    ArrivalStopId,
    Price,
    VehicleId,
    DriverId,
    CreatedAt,
}

#[derive(Iden)]
pub enum ScheduleStops {
    Table,
    Id,
    LegId,
    StopId,
    DepartTime,
    Sort,
    CreatedAt,
}
