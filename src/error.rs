//! Error types for Wicket

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'wicket init' first.")]
    ConfigNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session token is malformed")]
    TokenMalformed,

    #[error("Session token signature mismatch")]
    TokenSignatureMismatch,

    #[error("Session token expired")]
    TokenExpired,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// Whether this failure belongs to the credential/token class that is
    /// reported uniformly to clients.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::InvalidCredentials
                | Error::TokenMalformed
                | Error::TokenSignatureMismatch
                | Error::TokenExpired
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // All unauthorized variants collapse to one body so clients cannot
        // distinguish unknown user / wrong password / bad token.
        let (status, message) = if self.is_unauthorized() {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        } else if matches!(self, Error::StorageUnavailable(_)) {
            (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
        };

        let body = Json(json!({
            "success": false,
            "data": null,
            "error": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(Error::InvalidCredentials.is_unauthorized());
        assert!(Error::TokenMalformed.is_unauthorized());
        assert!(Error::TokenSignatureMismatch.is_unauthorized());
        assert!(Error::TokenExpired.is_unauthorized());
        assert!(!Error::ConfigNotFound.is_unauthorized());
    }

    #[test]
    fn test_uniform_unauthorized_responses() {
        // Unknown user, wrong password and tampered token must produce the
        // same status class at the HTTP boundary.
        for err in [
            Error::InvalidCredentials,
            Error::TokenSignatureMismatch,
            Error::TokenExpired,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
