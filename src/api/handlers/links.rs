//! Handlers for owner-scoped link management (list, get, delete).

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::pagination::{ListLinksParams, ListLinksResponse, total_pages};
use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /urls?page=1&limit=10&search=example`
///
/// # Query Parameters
///
/// - `page` - Page number (default: 1)
/// - `limit` - Items per page, 1-100 (default: 10)
/// - `search` - Case-insensitive match on URL, code or alias
///
/// # Response
///
/// ```json
/// {
///   "urls": [ { "id": 1, "code": "abc123", ... } ],
///   "total": 42,
///   "currentPage": 1,
///   "totalPages": 5
/// }
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<ListLinksResponse>, AppError> {
    let (query, page, limit) = params
        .into_query()
        .map_err(|msg| AppError::bad_request(msg, json!({})))?;

    let (links, total) = state.link_service.list_links(owner.id, query).await?;

    let urls = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(ListLinksResponse {
        urls,
        total,
        current_page: page,
        total_pages: total_pages(total, limit),
    }))
}

/// Returns one of the caller's links.
///
/// # Endpoint
///
/// `GET /urls/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist or belongs to another
/// token.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(owner.id, id).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Permanently deletes one of the caller's links and its click history.
///
/// # Endpoint
///
/// `DELETE /urls/{id}`
///
/// # Response
///
/// `204 No Content` on success, 404 if the link is not found.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
