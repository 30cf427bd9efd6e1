pub mod model;
pub mod repository;

pub use model::{duration_hours, parse_time_of_day, Trip, TripPoint, TripStatus};
pub use repository::TripRepository;
