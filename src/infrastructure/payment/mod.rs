pub mod gateway;
pub mod signature;

pub use gateway::HttpPaymentGateway;
pub use signature::verify_signature;
