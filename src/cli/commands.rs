//! CLI command implementations

use anyhow::{bail, Result};
use rand::distr::Alphanumeric;
use rand::RngExt;
use std::fs;
use std::path::Path;

use crate::api;
use crate::auth::CredentialStore;
use crate::config::{self, default_config_content};

const CONFIG_FILENAME: &str = "wicket.toml";
const SECRET_LEN: usize = 48;

/// Write a default wicket.toml with a freshly generated signing secret.
pub async fn init() -> Result<()> {
    if Path::new(CONFIG_FILENAME).exists() {
        bail!("{} already exists, refusing to overwrite", CONFIG_FILENAME);
    }

    fs::write(CONFIG_FILENAME, default_config_content(&generate_secret()))?;
    println!("Created {} with a generated session secret", CONFIG_FILENAME);
    Ok(())
}

/// Random alphanumeric signing secret for a freshly initialized config.
fn generate_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Provision a user row. Idempotent: re-adding an existing username leaves
/// the stored credential untouched.
pub async fn adduser(username: &str, password: Option<String>) -> Result<()> {
    let config = config::load_config()?;

    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for {}", username))
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let store = CredentialStore::open(&config.storage.path, config.storage.bcrypt_cost)?;
    let existed = store.find_user(username).await?.is_some();
    store.register(username, &password).await?;

    if existed {
        println!("User '{}' already exists, credential left unchanged", username);
    } else {
        println!("User '{}' created", username);
    }
    Ok(())
}

/// Run the HTTP server, with optional host/port overrides from the CLI.
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config()?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    api::run_server(config, &host, port).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secret_is_usable() {
        let secret = generate_secret();
        assert_eq!(secret.len(), SECRET_LEN);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));

        // Two draws must not collide
        assert_ne!(secret, generate_secret());

        // The generated secret drops straight into a parseable config
        let config: crate::config::Config =
            toml::from_str(&default_config_content(&secret)).expect("Config must parse");
        assert_eq!(config.session.secret, secret);
    }
}
