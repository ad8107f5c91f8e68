//! Handler for per-link analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click totals and history for one of the caller's links.
///
/// # Endpoint
///
/// `GET /urls/{id}/analytics`
///
/// # Response
///
/// ```json
/// {
///   "totalClicks": 2,
///   "clickHistory": [
///     {
///       "timestamp": "2025-01-15T10:30:00Z",
///       "ip": "203.0.113.7",
///       "userAgent": "Mozilla/5.0",
///       "referrer": "direct"
///     }
///   ],
///   "createdAt": "2025-01-01T12:00:00Z",
///   "lastClicked": "2025-01-15T10:30:00Z"
/// }
/// ```
///
/// History is oldest first; `lastClicked` is null for a never-clicked link.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let analytics = state.analytics_service.link_analytics(owner.id, id).await?;
    Ok(Json(analytics.into()))
}
