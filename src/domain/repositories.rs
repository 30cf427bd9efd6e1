//! Repository provider
//!
//! One trait bundling every per-aggregate repository so the API layer and
//! the background sweeps depend on a single injection point.

use crate::domain::customer::CustomerRepository;
use crate::domain::fleet::FleetRepository;
use crate::domain::invoice::InvoiceRepository;
use crate::domain::order::OrderRepository;
use crate::domain::schedule::ScheduleRepository;
use crate::domain::seat::SeatRepository;
use crate::domain::trip::TripRepository;
use crate::domain::voucher::VoucherRepository;

pub trait RepositoryProvider: Send + Sync {
    fn schedules(&self) -> &dyn ScheduleRepository;
    fn trips(&self) -> &dyn TripRepository;
    fn seats(&self) -> &dyn SeatRepository;
    fn orders(&self) -> &dyn OrderRepository;
    fn invoices(&self) -> &dyn InvoiceRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn vouchers(&self) -> &dyn VoucherRepository;
    fn fleet(&self) -> &dyn FleetRepository;
}
