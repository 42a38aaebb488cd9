use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use thiserror::Error;

use super::dto::Message;

/// Every business-rule failure the service can report, plus the
/// infrastructure failures that surface at the request boundary.
/// All of them are recovered into a status code and a JSON message;
/// none should ever abort the process.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin access required!")]
    Forbidden,

    #[error("Slot {slot} is already occupied for {month} {year}!")]
    SlotOccupied {
        slot: String,
        month: String,
        year: String,
    },

    #[error("Username already exists!")]
    DuplicateUsername,

    #[error("Cannot delete primary admin!")]
    ProtectedResource,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("Error generating bill: {0}")]
    Pdf(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::Unauthenticated | Error::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            Error::Forbidden | Error::ProtectedResource => StatusCode::FORBIDDEN,
            Error::SlotOccupied { .. } | Error::DuplicateUsername => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::PasswordHash(_) | Error::Pdf(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(Message::new(&self.to_string()))).into_response()
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(error: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_expected_statuses() {
        assert_eq!(Error::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::DuplicateUsername.status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::ProtectedResource.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::NotFound("User").status_code(), StatusCode::NOT_FOUND);
        let occupied = Error::SlotOccupied {
            slot: "SLOT-01".into(),
            month: "January".into(),
            year: "2025".into(),
        };
        assert_eq!(occupied.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            occupied.to_string(),
            "Slot SLOT-01 is already occupied for January 2025!"
        );
    }
}
