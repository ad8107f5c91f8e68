//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::ShortenRequest;
use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the authenticated token.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com/page",
///   "customAlias": "promo",               // optional
///   "expiresAt": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "code": "promo",
///   "shortUrl": "http://localhost:3000/promo",
///   "originalUrl": "https://example.com/page",
///   "customAlias": "promo",
///   "clickCount": 0,
///   "expiresAt": "2030-01-01T00:00:00Z",
///   "active": true,
///   "createdAt": "2025-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid URL, an invalid or taken alias, or
/// an expiry that is not in the future.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.shorten(owner.id, payload.into()).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}
