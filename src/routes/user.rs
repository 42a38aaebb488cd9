use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{LoginInfo, Profile, TokenResponse},
        Error, TokenClaim, User,
    },
    AppState,
};

use super::middlewares::auth_guard;

#[derive(OpenApi)]
#[openapi(paths(login_handler, get_profile_handler))]
/// Defines the OpenAPI spec for user endpoints
pub struct UsersApi;

/// Used to group user endpoints together in the OpenAPI documentation
pub const USER_API_GROUP: &str = "USER";

/// Builds a router for all the user routes
pub fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login_handler))
        .route(
            "/profile",
            get(get_profile_handler)
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard)),
        )
}

// Login handler function
#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = USER_API_GROUP,
    request_body = LoginInfo,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid username or password"),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginInfo>,
) -> Result<impl IntoResponse, Error> {
    // A missing user and a wrong password produce the same error so
    // usernames cannot be enumerated through this endpoint.
    let user = state
        .db
        .get_user_by_username(&body.username)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    let hash = PasswordHash::new(&user.hashed_password)?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &hash)
        .map_err(|_| Error::InvalidCredentials)?;

    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::days(7)).timestamp() as usize;

    let claims = TokenClaim {
        sub: user.username,
        exp,
        iat,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_ref()),
    )?;

    Ok(Json(TokenResponse { token }))
}

// Get profile handler function
#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = USER_API_GROUP,
    responses(
        (status = 200, description = "User profile successfully retrieved", body = Profile),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn get_profile_handler(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(Profile::from(user))
}
