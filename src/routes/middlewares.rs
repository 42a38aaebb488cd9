use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{
    models::{Error, Role, TokenClaim, User},
    AppState,
};

/// Requires a valid bearer token and attaches the authenticated user
/// to the request extensions for downstream handlers.
pub async fn auth_guard(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::Unauthenticated)?;

    let claims = decode::<TokenClaim>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?
    .claims;

    let user = state
        .db
        .get_user_by_username(&claims.sub)
        .await?
        .ok_or(Error::Unauthenticated)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Requires the user attached by [`auth_guard`] to hold the admin role.
pub async fn admin_guard(req: Request, next: Next) -> Result<Response, Error> {
    let user = req.extensions().get::<User>().ok_or(Error::Forbidden)?;
    if user.role != Role::Admin {
        return Err(Error::Forbidden);
    }
    Ok(next.run(req).await)
}
