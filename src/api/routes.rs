//! API route handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;

use super::server::SharedState;
use crate::auth::{Identity, LoginRequest, SessionInfo};
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Session routes

/// Verify posted credentials and hand the session cookie back to the client.
/// Any failure surfaces as the uniform 401 via `Error::into_response`.
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let cookie = state.auth.login(&req.username, &req.password).await?;

    tracing::info!(username = %req.username, "Login succeeded");

    Ok((
        [(header::SET_COOKIE, cookie.header_value())],
        Json(ApiResponse::ok(SessionInfo {
            username: req.username,
        })),
    ))
}

/// Clear the session cookie. The token itself is not revoked server-side;
/// it lapses at its natural expiry.
pub async fn logout(State(state): State<SharedState>) -> impl IntoResponse {
    let cookie = state.auth.logout();

    (
        [(header::SET_COOKIE, cookie.header_value())],
        Json(ApiResponse::ok("logged out")),
    )
}

// Protected routes

/// Echo the identity the gateway resolved. Only reachable through the
/// session gateway, so the extension is always present.
pub async fn whoami(Extension(identity): Extension<Identity>) -> impl IntoResponse {
    Json(ApiResponse::ok(SessionInfo::from(identity)))
}

/// Fallback for unmatched paths under the protected prefix. Sits behind the
/// gateway, so unauthenticated clients see the uniform 401 before any 404.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}
