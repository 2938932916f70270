//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (backend reachable)
//!
//! # Auth (guests only)
//! GET  /auth?mode=signin|signup     - Credential form
//! POST /auth                        - Submit credentials (rate limited)
//! POST /auth/logout                 - Sign out
//!
//! # Browsing (requires session)
//! GET  /                            - Catalogue
//! GET  /profiles                    - Profile picker
//! GET  /account                     - Account overview
//! GET  /favorites?info={movie_id}   - Favorites with optional detail overlay
//! POST /favorites/{movie_id}        - Add favorite
//! POST /favorites/{movie_id}/remove - Remove favorite
//! ```

pub mod account;
pub mod auth;
pub mod favorites;
pub mod home;
pub mod movies;
pub mod profiles;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    routing::{MethodRouter, get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    auth_rate_limiter, create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the auth routes router.
fn auth_routes(rate_limited: bool) -> Router<AppState> {
    let submit: MethodRouter<AppState> = if rate_limited {
        post(auth::submit).layer(auth_rate_limiter())
    } else {
        post(auth::submit)
    };

    Router::new()
        .route("/", get(auth::page).merge(submit))
        .route("/logout", post(auth::logout))
}

/// Create the favorites routes router.
fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/{movie_id}", post(favorites::add))
        .route("/{movie_id}/remove", post(favorites::remove))
}

/// Create all page routes.
pub fn routes(rate_limited: bool) -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/profiles", get(profiles::index))
        .route("/account", get(account::index))
        .nest("/auth", auth_routes(rate_limited))
        .nest("/favorites", favorites_routes())
}

/// Build the full application: routes, static files, and the middleware
/// stack described in [`crate::middleware`]. Sentry layers are added by the
/// binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let rate_limited = state.config().auth_rate_limit;

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes(rate_limited))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = request.uri().path(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the content backend does not answer.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.backend().is_reachable().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Only same-site absolute paths are accepted as redirect targets.
fn safe_return_path(candidate: Option<&str>, fallback: &'static str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}
