use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Datelike, Utc};
use tracing::{error, info};
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{BillResponse, NewBill, SearchQuery, SlotsResponse},
        slots, Error, User,
    },
    pdf, AppState,
};

use super::middlewares::auth_guard;

#[derive(OpenApi)]
#[openapi(paths(get_slots_handler, create_bill_handler, search_bills_handler))]
/// Defines the OpenAPI spec for billing endpoints
pub struct BillingApi;

/// Used to group billing endpoints together in the OpenAPI documentation
pub const BILLING_API_GROUP: &str = "BILLING";

/// Builds a router for the booking-form and billing routes
pub fn billing_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/slots", get(get_slots_handler))
        .route("/bills", post(create_bill_handler))
        .route("/search", get(search_bills_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Get booking form reference data handler function
#[utoipa::path(
    get,
    path = "/api/slots",
    tag = BILLING_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Booking form reference data", body = SlotsResponse),
    )
)]
pub async fn get_slots_handler() -> impl IntoResponse {
    Json(SlotsResponse {
        slots: slots::slot_numbers(),
        years: slots::years(),
        current_year: Utc::now().year(),
    })
}

/// Create bill handler function
#[utoipa::path(
    post,
    path = "/api/bills",
    tag = BILLING_API_GROUP,
    request_body = NewBill,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Bill created; the printable document is returned as an attachment", body = str, content_type = "application/pdf"),
        (status = 400, description = "Unknown slot, month or year"),
        (status = 409, description = "Slot already occupied for that rental period"),
    )
)]
pub async fn create_bill_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<User>,
    Json(mut body): Json<NewBill>,
) -> Result<impl IntoResponse, Error> {
    if !slots::is_valid_slot(&body.slot_number) {
        return Err(Error::Validation(format!(
            "Unknown parking slot {}",
            body.slot_number
        )));
    }
    if !slots::is_valid_month(&body.month) {
        return Err(Error::Validation(format!("Unknown month {}", body.month)));
    }
    if !slots::is_valid_year(&body.year) {
        return Err(Error::Validation(format!("Unknown year {}", body.year)));
    }

    body.vehicle_number = body.vehicle_number.to_uppercase();

    // The unique index on (slot_number, month, year) rejects a
    // double-booking here even under concurrent requests.
    let bill = state.db.create_bill(&body, &actor.username).await?;
    info!(
        "Bill {} created for {} {} by {}",
        bill.id, bill.slot_number, bill.month, actor.username
    );

    // The bill row is committed at this point; a render failure is
    // reported but leaves the bill in place.
    let bytes = pdf::render_bill(&bill).map_err(|e| {
        error!("PDF render failed for bill {}: {}", bill.id, e);
        e
    })?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf::download_filename(&bill)),
        ),
    ];
    Ok((headers, bytes))
}

/// Search bills handler function
#[utoipa::path(
    get,
    path = "/api/search",
    tag = BILLING_API_GROUP,
    params(
        ("q" = Option<String>, Query, description = "Substring to match against customer name, vehicle number or slot number")
    ),
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Matching bills, newest first, at most 50", body = [BillResponse]),
    )
)]
pub async fn search_bills_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<BillResponse>>, Error> {
    let q = query.q.unwrap_or_default();
    // An empty query returns nothing rather than every bill.
    if q.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let bills = state.db.search_bills(&q).await?;
    Ok(Json(bills.into_iter().map(BillResponse::from).collect()))
}
