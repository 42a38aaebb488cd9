mod health;
mod middlewares;
mod swagger;
mod user;
mod billing;
mod admin;
mod reports;
use crate::database;
use crate::bootstrap;
use health::health_checker_handler;
use tracing::info;
use tower_http::trace::TraceLayer;

use crate::{AppState, Config};

use axum::{routing::get, Router};
use std::error::Error;
use std::sync::Arc;

/// Builds the application router from environment configuration and
/// initialises logging. Binary entrypoint path.
pub async fn make_app() -> Result<(Router, String), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();
    let config = Config::init();
    let bind_addr = config.bind_addr.clone();
    let app = make_app_with(config).await?;
    Ok((app, bind_addr))
}

/// Builds the application router for an explicit [`Config`]. Used
/// directly by the integration tests with an in-memory database.
pub async fn make_app_with(config: Config) -> Result<Router, Box<dyn Error>> {
    info!("Connecting to SQLite at {}...", config.db_url);
    let pool = database::connect_sqlite(&config.db_url).await?;
    database::MIGRATOR.run(&pool).await?;
    info!("Connected, schema up to date");

    let db = database::ParkingDatabase::new(pool);
    bootstrap::ensure_admin(&db, &config).await?;

    let state = Arc::new(AppState { db, config });
    let ret = Router::new()
        .route("/api", get(health_checker_handler))
        .route("/api/health", get(health_checker_handler))
        .nest("/api/user", user::user_routes(state.clone()))
        .nest(
            "/api",
            billing::billing_routes(state.clone()).merge(reports::dashboard_routes(state.clone())),
        )
        .nest(
            "/api/admin",
            admin::admin_routes(state.clone()).merge(reports::report_routes(state.clone())),
        )
        .merge(swagger::build_documentation())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    Ok(ret)
}
