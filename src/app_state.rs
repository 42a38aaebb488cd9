use crate::config::Config;
use crate::database::ParkingDatabase;

pub struct AppState {
    pub db: ParkingDatabase,
    pub config: Config,
}
