use dotenv::dotenv;

/// Runtime configuration, read once at startup and passed into the
/// component constructors. No module-level mutable state.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    /// Password for the first-run admin account. Only consulted when
    /// no protected admin exists yet; there is no built-in default.
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    pub fn init() -> Config {
        dotenv().ok();
        Config {
            db_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:parking.db".into()),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            bootstrap_admin_password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        }
    }
}
