//! # Armada Transit Core Service
//!
//! Trip generation, seat inventory and payment-reconciliation engine for a
//! scheduled passenger-transport operation.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, state machines and repository traits
//! - **application**: Workflow services (generation, booking, reconciliation,
//!   cancellation, reminders) and background tasks
//! - **infrastructure**: External concerns (database, payment gateway,
//!   notification dispatch)
//! - **api**: REST API with Swagger documentation
//! - **shared**: Shutdown coordination, code generation, keyed locking

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::migrator::Migrator;
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
