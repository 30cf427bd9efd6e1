//! Domain layer
//!
//! Pure business types, transition rules and repository interfaces. Nothing
//! in here touches the database or the network; the infrastructure layer
//! implements the interfaces and the application layer drives them.

pub mod customer;
pub mod error;
pub mod fleet;
pub mod invoice;
pub mod order;
pub mod ports;
pub mod reminder;
pub mod repositories;
pub mod schedule;
pub mod seat;
pub mod subscription;
pub mod trip;
pub mod voucher;

pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
