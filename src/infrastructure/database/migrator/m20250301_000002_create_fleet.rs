//! Create fleet tables
//!
//! Vehicles with their physical seat layouts, plus drivers. The vehicle row
//! carries the maintenance-reminder watermarks alongside the odometer.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Name).string().not_null())
                    .col(ColumnDef::new(Vehicles::PlateNumber).string().not_null())
                    .col(ColumnDef::new(Vehicles::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Vehicles::OdometerKm)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Vehicles::ServiceIntervalKm).big_integer())
                    .col(
                        ColumnDef::new(Vehicles::ServiceCycleNotified)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Vehicles::InspectionDue).date())
                    .col(ColumnDef::new(Vehicles::RegistrationDue).date())
                    .col(ColumnDef::new(Vehicles::InspectionNotifiedFor).date())
                    .col(ColumnDef::new(Vehicles::RegistrationNotifiedFor).date())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vehicles::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VehicleSeats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VehicleSeats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VehicleSeats::VehicleId).integer().not_null())
                    .col(ColumnDef::new(VehicleSeats::Code).string().not_null())
                    .col(ColumnDef::new(VehicleSeats::Row).integer().not_null())
                    .col(ColumnDef::new(VehicleSeats::Column).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_seats_vehicle")
                            .from(VehicleSeats::Table, VehicleSeats::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicle_seats_vehicle")
                    .table(VehicleSeats::Table)
                    .col(VehicleSeats::VehicleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drivers::Code).string().not_null())
                    .col(ColumnDef::new(Drivers::Name).string().not_null())
                    .col(ColumnDef::new(Drivers::Phone).string())
                    .col(
                        ColumnDef::new(Drivers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Drivers::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleSeats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Vehicles {
    Table,
    Id,
    Name,
    PlateNumber,
    Capacity,
    OdometerKm,
    ServiceIntervalKm,
    ServiceCycleNotified,
    InspectionDue,
    RegistrationDue,
    InspectionNotifiedFor,
    RegistrationNotifiedFor,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub enum VehicleSeats {
    Table,
    Id,
    VehicleId,
    Code,
    Row,
    Column,
}

#[derive(Iden)]
pub enum Drivers {
    Table,
    Id,
    Code,
    Name,
    Phone,
    CreatedAt,
    DeletedAt,
}
