//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a code or custom alias to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up an active link by code or alias
/// 2. Reject expired links with 410 without counting a click
/// 3. Record the click (client IP, `User-Agent`, `Referer`)
/// 4. Return 302 Found with `Location` set to the original URL
///
/// Click recording never blocks the redirect: if the click store fails the
/// redirect is still returned.
///
/// # Errors
///
/// - 404 Not Found if no active link matches
/// - 410 Gone if the link has expired
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let ip = client_ip(&headers, addr, state.behind_proxy);

    let event = ClickEvent::new(
        Some(ip.to_string()),
        headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    let original_url = state.redirect_service.resolve(&code, event).await?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, original_url.as_str()),
            (header::CACHE_CONTROL, "no-store"),
        ],
    )
        .into_response())
}
