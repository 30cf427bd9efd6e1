//! Fleet domain entities
//!
//! The maintenance fields and their de-dup watermarks feed the reminder
//! sweeps; everything else about a vehicle is snapshotted onto trips at
//! generation time.

use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    pub plate_number: String,
    pub capacity: i32,
    pub odometer_km: i64,
    /// Kilometers between services; `None` disables odometer reminders
    pub service_interval_km: Option<i64>,
    /// De-dup watermark: highest service cycle index already notified
    pub service_cycle_notified: i64,
    pub inspection_due: Option<NaiveDate>,
    pub registration_due: Option<NaiveDate>,
    /// De-dup watermarks for the date-based reminders
    pub inspection_notified_for: Option<NaiveDate>,
    pub registration_notified_for: Option<NaiveDate>,
}
