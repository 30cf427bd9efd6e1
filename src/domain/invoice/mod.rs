pub mod model;
pub mod repository;

pub use model::{Invoice, PaymentOutcome};
pub use repository::InvoiceRepository;
