use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};
use chrono::Utc;
use utoipa::OpenApi;

use crate::{
    database::{calendar_month_name, calendar_month_range},
    models::{
        dto::{BillResponse, DashboardResponse, ReportsResponse},
        slots, Error,
    },
    AppState,
};

use super::middlewares::{admin_guard, auth_guard};

#[derive(OpenApi)]
#[openapi(paths(dashboard_handler, reports_handler))]
/// Defines the OpenAPI spec for reporting endpoints
pub struct ReportsApi;

/// Used to group reporting endpoints together in the OpenAPI documentation
pub const REPORTS_API_GROUP: &str = "REPORTS";

/// Builds a router for the dashboard summary (any logged-in user)
pub fn dashboard_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Builds a router for the aggregated reports (admin only)
pub fn report_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports", get(reports_handler))
        .route_layer(middleware::from_fn(admin_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Dashboard summary handler function
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = REPORTS_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, Error> {
    let now = Utc::now();

    // Bills *created* this calendar month, keyed on bill_date. This is
    // not the same count as slot occupancy below, which is keyed on
    // the rental period a bill covers.
    let (start, end) = calendar_month_range(now);
    let monthly_count = state.db.bills_created_between(start, end).await?;

    let total_bills = state.db.count_bills().await?;
    let recent_bills = state.db.recent_bills(5).await?;

    let occupied = state
        .db
        .occupied_slot_count(calendar_month_name(now), &now.format("%Y").to_string())
        .await?;
    let total_slots = slots::TOTAL_SLOTS as i64;

    Ok(Json(DashboardResponse {
        monthly_count,
        total_bills,
        recent_bills: recent_bills.into_iter().map(BillResponse::from).collect(),
        available_slots: total_slots - occupied,
        total_slots,
    }))
}

/// Aggregated reports handler function
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    tag = REPORTS_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Monthly and per-vehicle-type summaries", body = ReportsResponse),
    )
)]
pub async fn reports_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReportsResponse>, Error> {
    let monthly = state.db.monthly_report().await?;
    let vehicle_types = state.db.vehicle_type_stats().await?;
    Ok(Json(ReportsResponse {
        monthly,
        vehicle_types,
    }))
}
