//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public)
//! - `GET  /health`   - Health check (public)
//! - `POST /shorten`, `/urls/*` - Link management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-client token bucket, stricter for authenticated routes
//! - **Authentication** - Bearer token, resolving the link owner
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::rate_limit::{ClientRateLimiter, RateLimitSettings};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::api::routes::{protected_routes, public_routes};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `limits` - public route limits; authenticated routes use
///   [`RateLimitSettings::secure`]
pub fn app_router(state: AppState, limits: RateLimitSettings) -> NormalizePath<Router> {
    let router = api_router(state, limits, limits.secure());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Routes and middleware without path normalization, with explicit limits
/// for each route group.
pub fn api_router(
    state: AppState,
    public_limits: RateLimitSettings,
    protected_limits: RateLimitSettings,
) -> Router {
    let public_limiter = ClientRateLimiter::new(public_limits);
    let protected_limiter = ClientRateLimiter::new(protected_limits);

    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(middleware::from_fn_with_state(protected_limiter, rate_limit::layer));

    let public =
        public_routes().layer(middleware::from_fn_with_state(public_limiter, rate_limit::layer));

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(tracing::layer())
}
