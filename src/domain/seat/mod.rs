pub mod model;
pub mod repository;

pub use model::{Seat, SeatStatus};
pub use repository::SeatRepository;
