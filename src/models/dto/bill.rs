use crate::models::ParkingBill;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewBill {
    pub customer_name: String,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub slot_number: String,
    pub month: String,
    pub year: String,
    pub payment_mode: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: i64,
    pub customer_name: String,
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub slot_number: String,
    pub month: String,
    pub year: String,
    pub payment_mode: String,
    pub amount: f64,
    pub bill_date: String,
    pub generated_by: String,
    pub is_paid: bool,
}

impl From<ParkingBill> for BillResponse {
    fn from(bill: ParkingBill) -> Self {
        Self {
            id: bill.id,
            customer_name: bill.customer_name,
            vehicle_number: bill.vehicle_number,
            vehicle_type: bill.vehicle_type,
            slot_number: bill.slot_number,
            month: bill.month,
            year: bill.year,
            payment_mode: bill.payment_mode,
            amount: bill.amount,
            bill_date: bill.bill_date.to_string(),
            generated_by: bill.generated_by,
            is_paid: bill.is_paid,
        }
    }
}

/// Reference data for the booking form: the fixed slot list, the
/// selectable years and the current year for preselection.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotsResponse {
    pub slots: Vec<String>,
    pub years: Vec<String>,
    pub current_year: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillPage {
    pub bills: Vec<BillResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
