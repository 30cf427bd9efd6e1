//! Create trip tables
//!
//! Trips are denormalized snapshots generated from schedule templates;
//! trip_seats carry the per-seat state machine with an optimistic version
//! column; trip_points hold the display waypoint list.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trips::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trips::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Trips::SpjCode).string().not_null())
                    .col(ColumnDef::new(Trips::RouteId).integer().not_null())
                    .col(ColumnDef::new(Trips::Date).date().not_null())
                    .col(ColumnDef::new(Trips::Sort).integer().not_null().default(0))
                    .col(ColumnDef::new(Trips::DepartureStopId).integer().not_null())
                    .col(
                        ColumnDef::new(Trips::DepartureStopName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::DepartureCity).string().not_null())
                    .col(ColumnDef::new(Trips::ArrivalStopId).integer().not_null())
                    .col(ColumnDef::new(Trips::ArrivalStopName).string().not_null())
                    .col(ColumnDef::new(Trips::ArrivalCity).string().not_null())
                    .col(ColumnDef::new(Trips::DepartureTime).string().not_null())
                    .col(ColumnDef::new(Trips::ArrivalTime).string().not_null())
                    .col(
                        ColumnDef::new(Trips::DurationHours)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Trips::TicketSold)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Trips::BasePrice).big_integer().not_null())
                    .col(ColumnDef::new(Trips::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Trips::VehicleName).string().not_null())
                    .col(ColumnDef::new(Trips::PlateNumber).string().not_null())
                    .col(ColumnDef::new(Trips::DriverId).integer().not_null())
                    .col(ColumnDef::new(Trips::DriverCode).string().not_null())
                    .col(ColumnDef::new(Trips::DriverName).string().not_null())
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Trips::ActualDepartureAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Trips::ActualArrivalAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_route_date")
                    .table(Trips::Table)
                    .col(Trips::RouteId)
                    .col(Trips::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_status")
                    .table(Trips::Table)
                    .col(Trips::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripSeats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TripSeats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TripSeats::TripId).integer().not_null())
                    .col(ColumnDef::new(TripSeats::Code).string().not_null())
                    .col(ColumnDef::new(TripSeats::Row).integer().not_null())
                    .col(ColumnDef::new(TripSeats::Column).integer().not_null())
                    .col(
                        ColumnDef::new(TripSeats::IsAvail)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TripSeats::Status)
                            .string()
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(ColumnDef::new(TripSeats::HoldExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(TripSeats::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TripSeats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_seats_trip")
                            .from(TripSeats::Table, TripSeats::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_seats_trip")
                    .table(TripSeats::Table)
                    .col(TripSeats::TripId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_seats_status_expiry")
                    .table(TripSeats::Table)
                    .col(TripSeats::Status)
                    .col(TripSeats::HoldExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TripPoints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TripPoints::TripId).integer().not_null())
                    .col(ColumnDef::new(TripPoints::StopId).integer().not_null())
                    .col(ColumnDef::new(TripPoints::StopName).string().not_null())
                    .col(ColumnDef::new(TripPoints::City).string().not_null())
                    .col(ColumnDef::new(TripPoints::DepartTime).string().not_null())
                    .col(
                        ColumnDef::new(TripPoints::Sort)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TripPoints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_points_trip")
                            .from(TripPoints::Table, TripPoints::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_points_trip")
                    .table(TripPoints::Table)
                    .col(TripPoints::TripId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TripPoints::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripSeats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Trips {
    Table,
    Id,
    Code,
    SpjCode,
    RouteId,
    Date,
    Sort,
    DepartureStopId,
    DepartureStopName,
    DepartureCity,
    ArrivalStopId,
    ArrivalStopName,
    ArrivalCity,
    DepartureTime,
    ArrivalTime,
    DurationHours,
    Capacity,
    TicketSold,
    BasePrice,
    VehicleId,
    VehicleName,
    PlateNumber,
    DriverId,
    DriverCode,
    DriverName,
    Status,
    ActualDepartureAt,
    ActualArrivalAt,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub enum TripSeats {
    Table,
    Id,
    TripId,
    Code,
    Row,
    Column,
    IsAvail,
    Status,
    HoldExpiresAt,
    Version,
    CreatedAt,
}

#[derive(Iden)]
pub enum TripPoints {
    Table,
    Id,
    TripId,
    StopId,
    StopName,
    City,
    DepartTime,
    Sort,
    CreatedAt,
}
