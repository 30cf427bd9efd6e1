//! Create stops table
//!
//! Master data for boarding/alighting points.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stops::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stops::Name).string().not_null())
                    .col(ColumnDef::new(Stops::City).string().not_null())
                    .col(
                        ColumnDef::new(Stops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Stops::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stops::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Stops {
    Table,
    Id,
    Name,
    City,
    CreatedAt,
    DeletedAt,
}
