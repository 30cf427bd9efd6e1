//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_stops;
mod m20250301_000002_create_fleet;
mod m20250301_000003_create_customers;
mod m20250301_000004_create_vouchers;
mod m20250301_000005_create_schedules;
mod m20250301_000006_create_trips;
mod m20250301_000007_create_orders;
mod m20250301_000008_create_invoices;
mod m20250301_000009_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_stops::Migration),
            Box::new(m20250301_000002_create_fleet::Migration),
            Box::new(m20250301_000003_create_customers::Migration),
            Box::new(m20250301_000004_create_vouchers::Migration),
            Box::new(m20250301_000005_create_schedules::Migration),
            Box::new(m20250301_000006_create_trips::Migration),
            Box::new(m20250301_000007_create_orders::Migration),
            Box::new(m20250301_000008_create_invoices::Migration),
            Box::new(m20250301_000009_create_notifications::Migration),
        ]
    }
}
