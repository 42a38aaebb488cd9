pub mod dto;
pub mod error;
pub mod token_claim;
pub mod user;
pub mod bill;
pub mod role;
pub mod slots;
pub use error::Error;
pub use token_claim::TokenClaim;
pub use user::User;
pub use bill::ParkingBill;
pub use role::Role;
