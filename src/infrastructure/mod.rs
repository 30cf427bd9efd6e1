//! Infrastructure layer: database, payment gateway and notification
//! adapters behind the domain's repository and port interfaces.

pub mod database;
pub mod notify;
pub mod payment;
