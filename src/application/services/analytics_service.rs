//! Per-link click analytics.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{Click, ShortLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::LinkError;

/// Analytics for a single link.
#[derive(Debug, Clone)]
pub struct LinkAnalytics {
    pub link: ShortLink,
    pub total_clicks: i64,
    /// Chronological, oldest first.
    pub click_history: Vec<Click>,
    pub last_clicked: Option<DateTime<Utc>>,
}

/// Service for reading the click history of an owner's links.
pub struct AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    links: Arc<L>,
    clicks: Arc<C>,
}

impl<L, C> AnalyticsService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    pub fn new(links: Arc<L>, clicks: Arc<C>) -> Self {
        Self { links, clicks }
    }

    /// Returns the click count and full click history of one of the owner's
    /// links.
    ///
    /// The count is taken from the history read, so `total_clicks` always
    /// equals `click_history.len()` even while clicks land between the two
    /// store reads.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotFound`] if the link does not exist or belongs to
    /// another owner, [`LinkError::StoreUnavailable`] on store failures.
    pub async fn link_analytics(
        &self,
        owner_id: i64,
        link_id: i64,
    ) -> Result<LinkAnalytics, LinkError> {
        let mut link = self
            .links
            .find_owned(link_id, owner_id)
            .await?
            .ok_or_else(|| LinkError::NotFound(link_id.to_string()))?;

        let click_history = self.clicks.history(link.id).await?;
        let last_clicked = click_history.last().map(|c| c.clicked_at);
        let total_clicks = i64::try_from(click_history.len()).unwrap_or(i64::MAX);
        link.click_count = total_clicks;

        Ok(LinkAnalytics {
            total_clicks,
            link,
            click_history,
            last_clicked,
        })
    }
}
