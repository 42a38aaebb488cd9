use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{BillPage, BillResponse, Message, NewUser, PageQuery, Profile},
        Error,
    },
    AppState,
};

use super::middlewares::{admin_guard, auth_guard};

const BILLS_PER_PAGE: u32 = 20;

#[derive(OpenApi)]
#[openapi(paths(
    list_users_handler,
    add_user_handler,
    delete_user_handler,
    list_bills_handler
))]
/// Defines the OpenAPI spec for admin endpoints
pub struct AdminApi;

/// Used to group admin endpoints together in the OpenAPI documentation
pub const ADMIN_API_GROUP: &str = "ADMIN";

/// Builds a router for the admin routes. Layers run outermost last, so
/// `auth_guard` authenticates before `admin_guard` checks the role.
pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users_handler))
        .route("/users", post(add_user_handler))
        .route("/users/:id", delete(delete_user_handler))
        .route("/bills", get(list_bills_handler))
        .route_layer(middleware::from_fn(admin_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// List users handler function
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "All user accounts", body = [Profile]),
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Profile>>, Error> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(Profile::from).collect()))
}

/// Add user handler function
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = ADMIN_API_GROUP,
    request_body = NewUser,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "User successfully created", body = Profile),
        (status = 409, description = "Username already exists"),
    )
)]
pub async fn add_user_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed_password = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)?
        .to_string();

    let user = state
        .db
        .create_user(&body.username, &hashed_password, body.role, false)
        .await?;
    info!("User {} added with role {}", user.username, user.role);
    Ok(Json(Profile::from(user)))
}

/// Delete user handler function
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = ADMIN_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "The primary admin cannot be deleted"),
        (status = 404, description = "Unknown user ID"),
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or(Error::NotFound("User"))?;
    if user.is_protected {
        return Err(Error::ProtectedResource);
    }
    state.db.delete_user(id).await?;
    info!("User {} deleted", user.username);
    Ok(Json(Message::new("User deleted successfully!")))
}

/// List bills handler function
#[utoipa::path(
    get,
    path = "/api/admin/bills",
    tag = ADMIN_API_GROUP,
    params(
        ("page" = Option<u32>, Query, description = "1-based page number, 20 bills per page")
    ),
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "One page of bills, newest first", body = BillPage),
    )
)]
pub async fn list_bills_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BillPage>, Error> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * BILLS_PER_PAGE;
    let total_count = state.db.count_bills().await?;
    let bills = state.db.list_bills(BILLS_PER_PAGE, offset).await?;
    let total_pages = ((total_count as u32) + BILLS_PER_PAGE - 1) / BILLS_PER_PAGE;
    Ok(Json(BillPage {
        bills: bills.into_iter().map(BillResponse::from).collect(),
        page,
        per_page: BILLS_PER_PAGE,
        total_count,
        total_pages,
    }))
}
