//! Customer domain entity
//!
//! Resolved or created by contact phone at booking time; first-seen wins,
//! no merging.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    /// Unique contact phone, the resolution key
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
