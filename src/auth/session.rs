//! Login/logout session lifecycle
//!
//! `SessionFlow` orchestrates the credential store and the token service:
//! a successful login produces a cookie carrier holding a freshly signed
//! token, logout produces a carrier that tells the client to discard it.

use crate::auth::models::Identity;
use crate::auth::store::CredentialStore;
use crate::auth::token::TokenService;
use crate::error::Result;

/// Session cookie carrier handed back to the presentation layer as a
/// `Set-Cookie` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    value: String,
    max_age_secs: i64,
}

impl SessionCookie {
    /// Carrier for a freshly issued token
    pub fn issue(name: &str, token: &str, max_age_secs: i64) -> Self {
        Self {
            name: name.to_string(),
            value: token.to_string(),
            max_age_secs,
        }
    }

    /// Carrier that instructs the client to discard the session
    pub fn clear(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            max_age_secs: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw token (empty for a clearing carrier)
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_clearing(&self) -> bool {
        self.value.is_empty() && self.max_age_secs == 0
    }

    /// Render as a `Set-Cookie` header value. HttpOnly keeps the token away
    /// from scripts; SameSite=Strict keeps it off cross-site requests.
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
            self.name, self.value, self.max_age_secs
        )
    }
}

/// Coordinates credential verification and token issuance.
#[derive(Clone)]
pub struct SessionFlow {
    store: CredentialStore,
    tokens: TokenService,
    cookie_name: String,
}

impl SessionFlow {
    pub fn new(store: CredentialStore, tokens: TokenService, cookie_name: String) -> Self {
        Self {
            store,
            tokens,
            cookie_name,
        }
    }

    /// Verify credentials and, on success, wrap a new session token in a
    /// cookie carrier. Failures surface as the uniform `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionCookie> {
        let identity = self.store.verify(username, password).await?;
        let token = self.tokens.issue(&identity)?;
        Ok(SessionCookie::issue(
            &self.cookie_name,
            &token,
            self.tokens.ttl_secs(),
        ))
    }

    /// Client-side-only invalidation: the returned carrier clears the cookie,
    /// but an already issued token stays cryptographically valid until its
    /// natural expiry. There is no server-side revocation list.
    pub fn logout(&self) -> SessionCookie {
        SessionCookie::clear(&self.cookie_name)
    }

    /// Validate a bare token and resolve its identity.
    pub fn verify_token(&self, token: &str) -> Result<Identity> {
        self.tokens.validate(token)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn test_flow() -> (tempfile::TempDir, SessionFlow) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = CredentialStore::open(&dir.path().join("users.db"), 4).unwrap();
        let tokens = TokenService::new("flow-test-secret", &[], 3600).unwrap();
        (dir, SessionFlow::new(store, tokens, "wicket_session".to_string()))
    }

    #[tokio::test]
    async fn test_login_produces_valid_carrier() {
        let (_dir, flow) = test_flow();
        flow.store().register("alice", "wonderland").await.unwrap();

        let cookie = flow.login("alice", "wonderland").await.unwrap();
        assert_eq!(cookie.name(), "wicket_session");
        assert!(!cookie.is_clearing());

        let identity = flow.verify_token(cookie.value()).unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_failed_login_produces_no_carrier() {
        let (_dir, flow) = test_flow();
        flow.store().register("alice", "wonderland").await.unwrap();

        let result = flow.login("alice", "wrong").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_logout_clears_but_does_not_revoke() {
        let (_dir, flow) = test_flow();
        flow.store().register("alice", "wonderland").await.unwrap();

        let cookie = flow.login("alice", "wonderland").await.unwrap();
        let cleared = flow.logout();
        assert!(cleared.is_clearing());
        assert!(cleared.header_value().contains("Max-Age=0"));

        // Known limitation: the old token still verifies after logout
        assert!(flow.verify_token(cookie.value()).is_ok());
    }

    #[test]
    fn test_cookie_header_attributes() {
        let cookie = SessionCookie::issue("wicket_session", "tok123", 3600);
        let header = cookie.header_value();
        assert!(header.starts_with("wicket_session=tok123;"));
        assert!(header.contains("Max-Age=3600"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Strict"));
        assert!(header.contains("Path=/"));
    }
}
