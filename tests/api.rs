use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use parking_billing_backend::models::slots;
use parking_billing_backend::routes::make_app_with;
use parking_billing_backend::Config;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let config = Config {
        db_url: "sqlite::memory:".into(),
        jwt_secret: "test-secret".into(),
        bind_addr: "127.0.0.1:0".into(),
        bootstrap_admin_password: Some("admin123".into()),
    };
    make_app_with(config).await.expect("app should build")
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, req).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        request(
            Method::POST,
            "/api/user/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_owned()
}

fn bill_payload(name: &str, vehicle: &str, vtype: &str, slot: &str, month: &str, year: &str) -> Value {
    json!({
        "customer_name": name,
        "vehicle_number": vehicle,
        "vehicle_type": vtype,
        "slot_number": slot,
        "month": month,
        "year": year,
        "payment_mode": "cash",
    })
}

async fn create_bill(app: &Router, token: &str, payload: Value) -> (StatusCode, HeaderMap, Vec<u8>) {
    send(app, request(Method::POST, "/api/bills", Some(token), Some(payload))).await
}

#[tokio::test]
async fn bootstrap_admin_can_log_in() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let (status, profile) =
        send_json(&app, request(Method::GET, "/api/user/profile", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "admin");
    assert_eq!(profile["role"], "admin");
    assert_eq!(profile["is_protected"], true);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let app = test_app().await;
    let (status_a, body_a) = send_json(
        &app,
        request(
            Method::POST,
            "/api/user/login",
            None,
            Some(json!({ "username": "admin", "password": "nope" })),
        ),
    )
    .await;
    let (status_b, body_b) = send_json(
        &app,
        request(
            Method::POST,
            "/api/user/login",
            None,
            Some(json!({ "username": "ghost", "password": "nope" })),
        ),
    )
    .await;
    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a["message"], body_b["message"]);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app().await;
    let (status, _, _) = send(&app, request(Method::GET, "/api/dashboard", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) =
        send(&app, request(Method::GET, "/api/slots", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn operators_cannot_reach_admin_routes() {
    let app = test_app().await;
    let admin = login(&app, "admin", "admin123").await;
    let (status, _) = send_json(
        &app,
        request(
            Method::POST,
            "/api/admin/users",
            Some(&admin),
            Some(json!({ "username": "op1", "password": "op1pass", "role": "operator" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let op = login(&app, "op1", "op1pass").await;
    for uri in ["/api/admin/users", "/api/admin/bills", "/api/admin/reports"] {
        let (status, body) = send_json(&app, request(Method::GET, uri, Some(&op), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri} allowed an operator");
        assert_eq!(body["message"], "Admin access required!");
    }
    // Operators can still use the booking surface.
    let (status, _) = send_json(&app, request(Method::GET, "/api/slots", Some(&op), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn booking_form_reference_data() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let (status, body) = send_json(&app, request(Method::GET, "/api/slots", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 14);
    assert_eq!(slots[0], "SLOT-01");
    assert_eq!(slots[13], "SLOT-14");
    assert_eq!(body["years"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn creating_a_bill_returns_a_pdf_attachment() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let (status, headers, body) = create_bill(
        &app,
        &token,
        bill_payload("Alice", "tn10ab1234", "car", "SLOT-01", "January", "2025"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"Parking_Bill_Alice_January_2025_1.pdf\""
    );
    assert!(body.starts_with(b"%PDF"));

    // The stored bill is normalized and carries the fixed defaults.
    let (status, page) =
        send_json(&app, request(Method::GET, "/api/admin/bills", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
    let bill = &page["bills"][0];
    assert_eq!(bill["vehicle_number"], "TN10AB1234");
    assert_eq!(bill["amount"], 1000.0);
    assert_eq!(bill["is_paid"], true);
    assert_eq!(bill["generated_by"], "admin");
}

#[tokio::test]
async fn double_booking_a_slot_fails_and_creates_no_row() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let payload = bill_payload("Alice", "tn10ab1234", "car", "SLOT-01", "January", "2025");
    let (status, _, _) = create_bill(&app, &token, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = create_bill(&app, &token, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        message["message"],
        "Slot SLOT-01 is already occupied for January 2025!"
    );

    let (_, page) =
        send_json(&app, request(Method::GET, "/api/admin/bills", Some(&token), None)).await;
    assert_eq!(page["total_count"], 1);
}

#[tokio::test]
async fn same_slot_is_free_in_a_different_period() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let (status, _, _) = create_bill(
        &app,
        &token,
        bill_payload("Alice", "TN10AB1234", "car", "SLOT-01", "January", "2025"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = create_bill(
        &app,
        &token,
        bill_payload("Bob", "KA05XY9999", "bike", "SLOT-01", "February", "2025"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn junk_reference_data_is_rejected() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let cases = [
        bill_payload("Alice", "TN10AB1234", "car", "SLOT-99", "January", "2025"),
        bill_payload("Alice", "TN10AB1234", "car", "SLOT-01", "Smarch", "2025"),
        bill_payload("Alice", "TN10AB1234", "car", "SLOT-01", "January", "1999"),
    ];
    for payload in cases {
        let (status, _, _) = create_bill(&app, &token, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let (_, page) =
        send_json(&app, request(Method::GET, "/api/admin/bills", Some(&token), None)).await;
    assert_eq!(page["total_count"], 0);
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_a_second_row() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let new_user = json!({ "username": "op1", "password": "secret", "role": "operator" });
    let (status, _) = send_json(
        &app,
        request(Method::POST, "/api/admin/users", Some(&token), Some(new_user.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        request(Method::POST, "/api/admin/users", Some(&token), Some(new_user)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists!");

    let (_, users) =
        send_json(&app, request(Method::GET, "/api/admin/users", Some(&token), None)).await;
    assert_eq!(users.as_array().unwrap().len(), 2); // admin + op1
}

#[tokio::test]
async fn the_primary_admin_cannot_be_deleted() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let (_, users) =
        send_json(&app, request(Method::GET, "/api/admin/users", Some(&token), None)).await;
    let admin_id = users[0]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        request(
            Method::DELETE,
            &format!("/api/admin/users/{admin_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot delete primary admin!");

    let (_, users) =
        send_json(&app, request(Method::GET, "/api/admin/users", Some(&token), None)).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_users_works_and_unknown_ids_are_404() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let (_, created) = send_json(
        &app,
        request(
            Method::POST,
            "/api/admin/users",
            Some(&token),
            Some(json!({ "username": "op1", "password": "secret", "role": "operator" })),
        ),
    )
    .await;
    let op_id = created["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &app,
        request(Method::DELETE, &format!("/api/admin/users/{op_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        request(Method::DELETE, "/api/admin/users/9999", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_substrings_and_empty_query_returns_nothing() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    create_bill(
        &app,
        &token,
        bill_payload("Alice", "TN10AB1234", "car", "SLOT-01", "January", "2025"),
    )
    .await;
    create_bill(
        &app,
        &token,
        bill_payload("Bob", "KA05XY9999", "bike", "SLOT-02", "January", "2025"),
    )
    .await;

    let (status, body) =
        send_json(&app, request(Method::GET, "/api/search?q=", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (_, body) =
        send_json(&app, request(Method::GET, "/api/search?q=SLOT-01", Some(&token), None)).await;
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["customer_name"], "Alice");

    let (_, body) =
        send_json(&app, request(Method::GET, "/api/search?q=KA05", Some(&token), None)).await;
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["customer_name"], "Bob");

    let (_, body) =
        send_json(&app, request(Method::GET, "/api/search?q=li", Some(&token), None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bill_listing_pages_by_twenty() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    // 25 bookings across two rental periods so no slot is double-booked.
    let mut created = 0;
    for (month, slot_count) in [("January", 14), ("February", 11)] {
        for slot in 1..=slot_count {
            let (status, _, _) = create_bill(
                &app,
                &token,
                bill_payload(
                    "Alice",
                    "TN10AB1234",
                    "car",
                    &format!("SLOT-{slot:02}"),
                    month,
                    "2025",
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            created += 1;
        }
    }
    assert_eq!(created, 25);

    let (_, page1) =
        send_json(&app, request(Method::GET, "/api/admin/bills", Some(&token), None)).await;
    assert_eq!(page1["total_count"], 25);
    assert_eq!(page1["total_pages"], 2);
    assert_eq!(page1["per_page"], 20);
    assert_eq!(page1["bills"].as_array().unwrap().len(), 20);

    let (_, page2) = send_json(
        &app,
        request(Method::GET, "/api/admin/bills?page=2", Some(&token), None),
    )
    .await;
    assert_eq!(page2["page"], 2);
    assert_eq!(page2["bills"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn monthly_report_groups_and_orders_by_period() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    create_bill(
        &app,
        &token,
        bill_payload("Alice", "TN10AB1234", "car", "SLOT-01", "January", "2025"),
    )
    .await;
    create_bill(
        &app,
        &token,
        bill_payload("Bob", "KA05XY9999", "bike", "SLOT-02", "January", "2025"),
    )
    .await;
    create_bill(
        &app,
        &token,
        bill_payload("Cara", "MH12CD5678", "car", "SLOT-01", "February", "2025"),
    )
    .await;

    let (status, body) =
        send_json(&app, request(Method::GET, "/api/admin/reports", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);

    let monthly = body["monthly"].as_array().unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0]["month"], "January");
    assert_eq!(monthly[0]["count"], 2);
    assert_eq!(monthly[0]["total"], 2000.0);
    assert_eq!(monthly[1]["month"], "February");
    assert_eq!(monthly[1]["count"], 1);
    assert_eq!(monthly[1]["total"], 1000.0);

    let vehicle_types = body["vehicle_types"].as_array().unwrap();
    assert_eq!(vehicle_types.len(), 2);
    // Ordered by vehicle type name.
    assert_eq!(vehicle_types[0]["vehicle_type"], "bike");
    assert_eq!(vehicle_types[0]["count"], 1);
    assert_eq!(vehicle_types[1]["vehicle_type"], "car");
    assert_eq!(vehicle_types[1]["count"], 2);
}

#[tokio::test]
async fn dashboard_occupancy_and_counts() {
    let app = test_app().await;
    let token = login(&app, "admin", "admin123").await;
    let now = Utc::now();
    let month = slots::MONTHS[now.month0() as usize];
    let year = now.year().to_string();

    for slot in ["SLOT-01", "SLOT-02", "SLOT-03"] {
        let (status, _, _) = create_bill(
            &app,
            &token,
            bill_payload("Alice", "TN10AB1234", "car", slot, month, &year),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    // A bill for a different rental period still counts toward the
    // created-this-month number but not toward occupancy.
    let other_month = if month == "January" { "February" } else { "January" };
    create_bill(
        &app,
        &token,
        bill_payload("Bob", "KA05XY9999", "bike", "SLOT-04", other_month, "2029"),
    )
    .await;

    let (status, body) =
        send_json(&app, request(Method::GET, "/api/dashboard", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_slots"], 14);
    assert_eq!(body["available_slots"], 11);
    assert_eq!(body["monthly_count"], 4);
    assert_eq!(body["total_bills"], 4);
    assert_eq!(body["recent_bills"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn startup_without_bootstrap_password_fails_on_fresh_database() {
    let config = Config {
        db_url: "sqlite::memory:".into(),
        jwt_secret: "test-secret".into(),
        bind_addr: "127.0.0.1:0".into(),
        bootstrap_admin_password: None,
    };
    let err = make_app_with(config).await.err().expect("startup should fail");
    assert!(err.to_string().contains("BOOTSTRAP_ADMIN_PASSWORD"));
}
