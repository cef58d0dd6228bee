//! Session gateway middleware
//!
//! Applied only to routes mounted under the configured protected prefix.
//! A request either arrives with a valid session cookie and reaches the
//! inner handler with its `Identity` attached, or it is short-circuited
//! with a uniform unauthorized response. A missing cookie is treated the
//! same as an invalid token.

use crate::api::SharedState;
use crate::auth::models::Identity;
use crate::error::{Error, Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Pull the session token out of the request's `Cookie` header.
pub fn extract_session_token(req: &Request, cookie_name: &str) -> Option<String> {
    let cookie_header = req.headers().get("Cookie")?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == cookie_name && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Gateway middleware: admit with a resolved identity or reject.
pub async fn require_session(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let identity = authenticate(&state, &req).map_err(|e| {
        // Reason stays in the logs; the response body is uniform
        tracing::debug!(path = %req.uri().path(), reason = %e, "Rejected request to protected path");
        e
    })?;

    tracing::debug!(username = %identity.username, path = %req.uri().path(), "Admitted request");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

fn authenticate(state: &SharedState, req: &Request) -> Result<Identity> {
    match extract_session_token(req, state.auth.cookie_name()) {
        Some(token) => state.auth.verify_token(&token),
        None => Err(Error::TokenMalformed),
    }
}
