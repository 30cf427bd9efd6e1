//! Create invoice tables
//!
//! invoices mirror gateway invoices keyed by the merchant external
//! reference; subscription_orders are the non-ticket product reconciled
//! through the same webhook.

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_customers::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Invoices::ExternalRef)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Invoices::GatewayInvoiceId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::PaymentUrl).string().not_null())
                    .col(ColumnDef::new(Invoices::RawStatus).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::NormalizedStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::PaidAmount).big_integer())
                    .col(ColumnDef::new(Invoices::PaidAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Invoices::PaymentMethod).string())
                    .col(ColumnDef::new(Invoices::PaymentChannel).string())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubscriptionOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionOrders::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionOrders::CustomerId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubscriptionOrders::InvoiceId).integer())
                    .col(
                        ColumnDef::new(SubscriptionOrders::DurationMonths)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionOrders::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionOrders::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(SubscriptionOrders::ExpiredDate)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_orders_customer")
                            .from(SubscriptionOrders::Table, SubscriptionOrders::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_orders_invoice")
                    .table(SubscriptionOrders::Table)
                    .col(SubscriptionOrders::InvoiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriptionOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Invoices {
    Table,
    Id,
    ExternalRef,
    GatewayInvoiceId,
    PaymentUrl,
    RawStatus,
    NormalizedStatus,
    PaidAmount,
    PaidAt,
    PaymentMethod,
    PaymentChannel,
    CreatedAt,
}

#[derive(Iden)]
pub enum SubscriptionOrders {
    Table,
    Id,
    Code,
    CustomerId,
    InvoiceId,
    DurationMonths,
    Amount,
    Status,
    ExpiredDate,
    CreatedAt,
}
