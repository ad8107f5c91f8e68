//! JSON representation of a short link.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortLink;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    pub click_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            original_url: link.original_url,
            custom_alias: link.custom_alias,
            click_count: link.click_count,
            expires_at: link.expires_at,
            active: link.active,
            created_at: link.created_at,
        }
    }
}
