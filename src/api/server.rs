//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, CredentialStore, SessionFlow, TokenService};
use crate::config::Config;
use crate::error::Result;

use super::routes;

/// Application state shared across handlers. Built once at startup;
/// everything in it is read-only afterwards, so requests run in parallel
/// without coordination.
pub struct AppState {
    pub config: Config,
    pub auth: SessionFlow,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    config.validate()?;

    let store = CredentialStore::open(&config.storage.path, config.storage.bcrypt_cost)?;
    let tokens = TokenService::new(
        &config.session.secret,
        &config.session.previous_secrets,
        config.session.ttl_secs,
    )?;
    let auth = SessionFlow::new(store, tokens, config.session.cookie_name.clone());

    let state = Arc::new(AppState { config, auth });

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes. Only routes nested under the
/// configured protected prefix pass through the session gateway; every
/// other path bypasses it.
fn create_router(state: SharedState) -> Router {
    let prefix = state.config.server.protected_prefix.clone();

    // The gateway covers every request under the prefix, matched or not:
    // the inner fallback keeps unmatched paths inside this router so the
    // layer still runs, and unauthenticated probes get 401, never 404.
    let protected = Router::new()
        .route("/me", get(routes::whoami))
        .fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        // Public routes
        .route("/api/health", get(routes::health))
        .route("/api/login", post(routes::login))
        .route("/api/logout", post(routes::logout))
        // Gateway-protected routes
        .nest(&prefix, protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
