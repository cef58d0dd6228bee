//! Wicket - a small login service with a stateless session gateway
//!
//! This is the library interface for Wicket: a credential store with
//! irreversible password hashing, a signed time-limited session token
//! service, a gateway middleware protecting a configured path prefix, and
//! the login/logout flow tying them together.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;

pub use auth::{CredentialStore, Identity, SessionCookie, SessionFlow, TokenService};
pub use config::Config;
pub use error::Error;
