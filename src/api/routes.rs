//! API route configuration.

use crate::api::handlers::{
    analytics_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler, redirect_handler, shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that require Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /shorten`              - Create a short link
/// - `GET    /urls`                 - List the caller's links (paginated, searchable)
/// - `GET    /urls/{id}`            - Get one of the caller's links
/// - `DELETE /urls/{id}`            - Delete one of the caller's links
/// - `GET    /urls/{id}/analytics`  - Click history of one of the caller's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
        .route("/urls/{id}", get(get_link_handler).delete(delete_link_handler))
        .route("/urls/{id}/analytics", get(analytics_handler))
}

/// Unauthenticated routes.
///
/// # Endpoints
///
/// - `GET /health` - Store health check
/// - `GET /{code}` - Redirect by code or custom alias
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
