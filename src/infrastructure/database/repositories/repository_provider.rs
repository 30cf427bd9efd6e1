//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::customer::CustomerRepository;
use crate::domain::fleet::FleetRepository;
use crate::domain::invoice::InvoiceRepository;
use crate::domain::order::OrderRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::schedule::ScheduleRepository;
use crate::domain::seat::SeatRepository;
use crate::domain::trip::TripRepository;
use crate::domain::voucher::VoucherRepository;

use super::customer_repository::SeaOrmCustomerRepository;
use super::fleet_repository::SeaOrmFleetRepository;
use super::invoice_repository::SeaOrmInvoiceRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::schedule_repository::SeaOrmScheduleRepository;
use super::seat_repository::SeaOrmSeatRepository;
use super::trip_repository::SeaOrmTripRepository;
use super::voucher_repository::SeaOrmVoucherRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let trip = repos.trips().find_by_id(42).await?;
/// let seats = repos.seats().list_for_trip(42).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    schedules: SeaOrmScheduleRepository,
    trips: SeaOrmTripRepository,
    seats: SeaOrmSeatRepository,
    orders: SeaOrmOrderRepository,
    invoices: SeaOrmInvoiceRepository,
    customers: SeaOrmCustomerRepository,
    vouchers: SeaOrmVoucherRepository,
    fleet: SeaOrmFleetRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            schedules: SeaOrmScheduleRepository::new(db.clone()),
            trips: SeaOrmTripRepository::new(db.clone()),
            seats: SeaOrmSeatRepository::new(db.clone()),
            orders: SeaOrmOrderRepository::new(db.clone()),
            invoices: SeaOrmInvoiceRepository::new(db.clone()),
            customers: SeaOrmCustomerRepository::new(db.clone()),
            vouchers: SeaOrmVoucherRepository::new(db.clone()),
            fleet: SeaOrmFleetRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn schedules(&self) -> &dyn ScheduleRepository {
        &self.schedules
    }

    fn trips(&self) -> &dyn TripRepository {
        &self.trips
    }

    fn seats(&self) -> &dyn SeatRepository {
        &self.seats
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    fn invoices(&self) -> &dyn InvoiceRepository {
        &self.invoices
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn vouchers(&self) -> &dyn VoucherRepository {
        &self.vouchers
    }

    fn fleet(&self) -> &dyn FleetRepository {
        &self.fleet
    }
}
