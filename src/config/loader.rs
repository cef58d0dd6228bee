//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "wicket.toml";

/// Load configuration from wicket.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file with the given signing secret
pub fn default_config_content(secret: &str) -> String {
    format!(
        r#"# Wicket Configuration

[server]
host = "0.0.0.0"
port = 3000
# Requests under this prefix must carry a valid session cookie
protected_prefix = "/auth"

[storage]
path = "./wicket.db"
# bcrypt work factor; raise for production hardware
bcrypt_cost = 12

[session]
cookie_name = "wicket_session"
ttl_secs = 3600
# Generated at init time. Prefer an environment variable:
# secret = "${{WICKET_SECRET}}"
secret = "{secret}"
# During secret rotation, list superseded secrets here so existing
# sessions keep verifying until they expire:
# previous_secrets = ["old-secret"]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("WICKET_TEST_VAR", "hello");
        let content = "value = \"${WICKET_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("WICKET_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_config_parses() {
        let content = default_config_content("unit-test-secret");
        let config: Config = toml::from_str(&content).expect("Default config must parse");
        assert_eq!(config.session.secret, "unit-test-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secret_from_environment() {
        env::set_var("WICKET_TEST_SECRET", "from-env");
        let content = "[session]\nsecret = \"${WICKET_TEST_SECRET}\"";
        let config: Config = toml::from_str(&interpolate_env_vars(content)).unwrap();
        assert_eq!(config.session.secret, "from-env");
        env::remove_var("WICKET_TEST_SECRET");
    }
}
