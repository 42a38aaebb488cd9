use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One rental-period booking for one slot. Bills are immutable once
/// written; no update or delete query exists for this table.
#[derive(Debug, Deserialize, Serialize, Clone, sqlx::FromRow)]
pub struct ParkingBill {
    pub id: i64,
    pub customer_name: String,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub slot_number: String,
    pub month: String,
    pub year: String,
    pub payment_mode: String,
    pub amount: f64,
    pub bill_date: DateTime<Utc>,
    pub generated_by: String,
    pub is_paid: bool,
}
