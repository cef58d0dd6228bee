//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix placed behind the session gateway. Everything outside
    /// this prefix bypasses the gateway entirely.
    #[serde(default = "default_protected_prefix")]
    pub protected_prefix: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_protected_prefix() -> String {
    "/auth".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            protected_prefix: default_protected_prefix(),
        }
    }
}

/// Credential storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// bcrypt work factor for newly stored passwords
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./wicket.db")
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// Session token and cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Token time-to-live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,

    /// Signing secret. No default: it must come from the config file or an
    /// interpolated environment variable, never from source.
    #[serde(default)]
    pub secret: String,

    /// Older secrets that still verify existing tokens during rotation.
    /// New tokens are always signed with `secret`.
    #[serde(default)]
    pub previous_secrets: Vec<String>,
}

fn default_cookie_name() -> String {
    "wicket_session".to_string()
}

fn default_ttl_secs() -> i64 {
    3600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_secs: default_ttl_secs(),
            secret: String::new(),
            previous_secrets: Vec::new(),
        }
    }
}

impl Config {
    /// Validate fields that have no sensible default.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.session.secret.is_empty() {
            return Err(crate::error::Error::Config(
                "session.secret must be set (e.g. via ${WICKET_SECRET})".to_string(),
            ));
        }
        if !self.server.protected_prefix.starts_with('/') {
            return Err(crate::error::Error::Config(format!(
                "server.protected_prefix must start with '/': {}",
                self.server.protected_prefix
            )));
        }
        // Router nesting rejects "/" and trailing slashes at runtime; catch
        // them here so a bad config fails before the server starts
        if self.server.protected_prefix == "/" || self.server.protected_prefix.ends_with('/') {
            return Err(crate::error::Error::Config(format!(
                "server.protected_prefix must name a sub-path without a trailing '/': {}",
                self.server.protected_prefix
            )));
        }
        if self.session.ttl_secs <= 0 {
            return Err(crate::error::Error::Config(
                "session.ttl_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.protected_prefix, "/auth");
        assert_eq!(config.session.cookie_name, "wicket_session");
        assert_eq!(config.session.ttl_secs, 3600);
        assert!(config.session.previous_secrets.is_empty());
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.secret = "s3cret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        for prefix in ["auth", "/", "/auth/", ""] {
            let mut config = Config::default();
            config.session.secret = "s3cret".to_string();
            config.server.protected_prefix = prefix.to_string();
            assert!(
                config.validate().is_err(),
                "Prefix {:?} must be rejected",
                prefix
            );
        }
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [session]
            secret = "abc"
            ttl_secs = 60
            "#,
        )
        .expect("Failed to parse config");
        assert_eq!(config.session.secret, "abc");
        assert_eq!(config.session.ttl_secs, 60);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
