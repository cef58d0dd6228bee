//! Authentication and session management

pub mod middleware;
pub mod models;
pub mod session;
pub mod store;
pub mod token;

pub use middleware::{extract_session_token, require_session};
pub use models::{Identity, LoginRequest, SessionInfo, User};
pub use session::{SessionCookie, SessionFlow};
pub use store::CredentialStore;
pub use token::{Claims, TokenService};
