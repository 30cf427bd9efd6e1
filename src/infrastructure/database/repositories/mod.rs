//! SeaORM repository implementations

pub mod customer_repository;
pub mod fleet_repository;
pub mod invoice_repository;
pub mod order_repository;
pub mod repository_provider;
pub mod schedule_repository;
pub mod seat_repository;
pub mod trip_repository;
pub mod voucher_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
