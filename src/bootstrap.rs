use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use tracing::info;

use crate::{
    database::ParkingDatabase,
    models::{Error, Role},
    Config,
};

/// Provisions the protected admin account on first run. There is no
/// hardcoded default credential: when the database has no protected
/// admin yet, `BOOTSTRAP_ADMIN_PASSWORD` must be supplied or startup
/// fails with an instructive error.
pub async fn ensure_admin(db: &ParkingDatabase, config: &Config) -> Result<(), Error> {
    if db.get_protected_admin().await?.is_some() {
        return Ok(());
    }

    let password = config.bootstrap_admin_password.as_deref().ok_or_else(|| {
        Error::Validation(
            "No admin account exists yet; set BOOTSTRAP_ADMIN_PASSWORD for the first run".into(),
        )
    })?;

    let salt = SaltString::generate(&mut OsRng);
    let hashed_password = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    let admin = db
        .create_user("admin", &hashed_password, Role::Admin, true)
        .await?;
    info!("Provisioned first-run admin account (id {})", admin.id);
    Ok(())
}
