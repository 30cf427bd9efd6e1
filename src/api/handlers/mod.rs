//! REST API handlers

pub mod bookings;
pub mod health;
pub mod orders;
pub mod payments;
pub mod reminders;
pub mod schedules;
pub mod subscriptions;
pub mod trips;
pub mod vouchers;
