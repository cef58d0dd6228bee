//! Authentication models

use serde::{Deserialize, Serialize};

/// A stored user row. Owned by the credential store; never mutated after
/// provisioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated row id
    pub id: i64,
    /// Username for login, unique and immutable
    pub username: String,
    /// bcrypt hash of the password; the plaintext is never stored
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the row was created
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The authenticated subject resolved from a valid credential check or token.
/// Attached to request extensions by the session gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Login credentials as posted by the client. Consumed and discarded within
/// one verification call; never persisted or logged.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Manual Debug keeps the plaintext out of log output.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity payload returned by login and the protected whoami endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub username: String,
}

impl From<Identity> for SessionInfo {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.username,
        }
    }
}
