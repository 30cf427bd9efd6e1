pub mod model;
pub mod repository;

pub use model::{weekday_index, Schedule, ScheduleLeg, ScheduleStop, Stop};
pub use repository::ScheduleRepository;
