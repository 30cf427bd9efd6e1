//! Application services: the workflow layer between the HTTP surface and
//! the domain.

pub mod booking;
pub mod cancellation;
pub mod hold_expiry;
pub mod reconciliation;
pub mod reminder;
pub mod subscriptions;
pub mod trip_generator;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking::BookingService;
pub use cancellation::CancellationService;
pub use hold_expiry::start_hold_expiry_task;
pub use reconciliation::ReconciliationService;
pub use reminder::ReminderService;
pub use subscriptions::SubscriptionService;
pub use trip_generator::TripGenerator;
