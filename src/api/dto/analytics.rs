//! DTOs for the link analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkAnalytics;
use crate::domain::entities::Click;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_clicks: i64,
    pub click_history: Vec<ClickEntry>,
    pub created_at: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
}

/// One entry of a link's click history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEntry {
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
    pub referrer: String,
}

impl From<Click> for ClickEntry {
    fn from(c: Click) -> Self {
        Self {
            timestamp: c.clicked_at,
            ip: c.ip,
            user_agent: c.user_agent,
            referrer: c.referrer,
        }
    }
}

impl From<LinkAnalytics> for AnalyticsResponse {
    fn from(a: LinkAnalytics) -> Self {
        Self {
            total_clicks: a.total_clicks,
            created_at: a.link.created_at,
            last_clicked: a.last_clicked,
            click_history: a.click_history.into_iter().map(Into::into).collect(),
        }
    }
}
