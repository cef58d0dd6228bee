//! Signed session token issuance and validation
//!
//! Tokens are stateless JWTs: validity is decided purely by signature and
//! expiry, never by a server-side lookup. The signing secret is injected
//! from configuration at startup; rotation keeps superseded secrets around
//! for verification while new tokens are always signed with the current one.

use crate::auth::models::Identity;
use crate::error::{Error, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Token id, for diagnostics
    pub jti: String,
}

impl Claims {
    fn new(identity: &Identity, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: identity.username.clone(),
            iat: now,
            exp: now + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Issues and validates session tokens with a process-wide secret set.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    // Current secret first, then superseded ones still accepted for
    // verification until their tokens expire.
    decoding: Vec<DecodingKey>,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, previous_secrets: &[String], ttl_secs: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config(
                "Session secret must not be empty".to_string(),
            ));
        }

        let mut decoding = vec![DecodingKey::from_secret(secret.as_bytes())];
        decoding.extend(
            previous_secrets
                .iter()
                .map(|s| DecodingKey::from_secret(s.as_bytes())),
        );

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding,
            ttl_secs,
        })
    }

    /// Configured token time-to-live in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a signed token for the identity, expiring after the configured TTL.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let claims = Claims::new(identity, self.ttl_secs);
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::Other(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return the embedded identity.
    ///
    /// Failures are distinguished internally (`TokenMalformed`,
    /// `TokenSignatureMismatch`, `TokenExpired`) for diagnostics; the HTTP
    /// boundary collapses them into one unauthorized response.
    pub fn validate(&self, token: &str) -> Result<Identity> {
        let validation = self.validation();

        for key in &self.decoding {
            match decode::<Claims>(token, key, &validation) {
                Ok(data) => return Ok(Identity::new(data.claims.sub)),
                Err(e) => match e.kind() {
                    // Signature checked out on this key, the token is simply stale
                    ErrorKind::ExpiredSignature => return Err(Error::TokenExpired),
                    // Try the remaining rotation secrets
                    ErrorKind::InvalidSignature => continue,
                    // Structural problems are independent of the key
                    _ => return Err(Error::TokenMalformed),
                },
            }
        }

        Err(Error::TokenSignatureMismatch)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would keep admitting
        // tokens past their advertised TTL
        validation.leeway = 0;
        validation
    }
}
