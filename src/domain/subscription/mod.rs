pub mod model;

pub use model::{extend_expiry, SubscriptionStatus};
