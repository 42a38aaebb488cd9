mod app_state;
mod config;
pub mod bootstrap;
pub mod database;
pub mod models;
pub mod pdf;
pub mod routes;
pub use app_state::AppState;
pub use config::Config;
