use serde::Serialize;
use utoipa::ToSchema;

use super::BillResponse;

/// One (month, year) group of the monthly report.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct MonthlyReportRow {
    pub month: String,
    pub year: String,
    pub count: i64,
    pub total: f64,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct VehicleTypeRow {
    pub vehicle_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportsResponse {
    pub monthly: Vec<MonthlyReportRow>,
    pub vehicle_types: Vec<VehicleTypeRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub monthly_count: i64,
    pub total_bills: i64,
    pub recent_bills: Vec<BillResponse>,
    pub available_slots: i64,
    pub total_slots: i64,
}
