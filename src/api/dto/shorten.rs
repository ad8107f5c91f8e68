//! DTOs for the link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::application::services::ShortenInput;

/// Request to shorten a URL.
///
/// URL scheme/host and alias policy are checked by the link service so that
/// the error kind is reported precisely; this DTO only bounds input sizes.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,

    #[validate(length(max = 64))]
    pub custom_alias: Option<String>,

    /// After this instant the link answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenRequest> for ShortenInput {
    fn from(req: ShortenRequest) -> Self {
        ShortenInput {
            original_url: req.original_url,
            custom_alias: req.custom_alias.filter(|a| !a.is_empty()),
            expires_at: req.expires_at,
        }
    }
}
