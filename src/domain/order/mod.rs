pub mod model;
pub mod repository;

pub use model::{DisbursementStatus, Order, OrderItem, OrderStatus};
pub use repository::OrderRepository;
