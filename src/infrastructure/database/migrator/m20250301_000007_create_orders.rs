//! Create order tables
//!
//! Orders hold the money totals, refund details and the departure-reminder
//! watermark; order_items snapshot one passenger per seat.

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_customers::Customers;
use super::m20250301_000006_create_trips::{TripSeats, Trips};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Orders::TripId).integer().not_null())
                    .col(ColumnDef::new(Orders::InvoiceId).integer())
                    .col(ColumnDef::new(Orders::Total).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Discount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Orders::Subtotal).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Orders::CanceledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Orders::CancelReason).string())
                    .col(ColumnDef::new(Orders::RefundBankCode).string())
                    .col(ColumnDef::new(Orders::RefundAccountName).string())
                    .col(ColumnDef::new(Orders::RefundAccountNumber).string())
                    .col(
                        ColumnDef::new(Orders::DisbursementStatus)
                            .string()
                            .not_null()
                            .default("NONE"),
                    )
                    .col(ColumnDef::new(Orders::DisbursementResponse).text())
                    .col(ColumnDef::new(Orders::LastRemindedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_trip")
                            .from(Orders::Table, Orders::TripId)
                            .to(Trips::Table, Trips::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_trip")
                    .table(Orders::Table)
                    .col(Orders::TripId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::SeatId).integer().not_null())
                    .col(ColumnDef::new(OrderItems::PassengerName).string().not_null())
                    .col(ColumnDef::new(OrderItems::PassengerPhone).string())
                    .col(ColumnDef::new(OrderItems::PassengerAddress).string())
                    .col(ColumnDef::new(OrderItems::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::Discount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_seat")
                            .from(OrderItems::Table, OrderItems::SeatId)
                            .to(TripSeats::Table, TripSeats::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_seat")
                    .table(OrderItems::Table)
                    .col(OrderItems::SeatId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Orders {
    Table,
    Id,
    Code,
    CustomerId,
    TripId,
    InvoiceId,
    Total,
    Discount,
    Subtotal,
    Status,
    CanceledAt,
    CancelReason,
    RefundBankCode,
    RefundAccountName,
    RefundAccountNumber,
    DisbursementStatus,
    DisbursementResponse,
    LastRemindedAt,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub enum OrderItems {
    Table,
    Id,
    OrderId,
    SeatId,
    PassengerName,
    PassengerPhone,
    PassengerAddress,
    Price,
    Discount,
    CreatedAt,
}
