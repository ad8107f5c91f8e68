//! Resolution of short codes to their destination, with click tracking.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::LinkError;

/// Resolves lookup keys (code or custom alias) and records a click for every
/// successful resolution.
///
/// Recording is best-effort: a failing click store is logged and counted in
/// `shortlink_click_record_failures_total`, but the caller still receives the
/// destination. A click write that finds the link no longer active or
/// unexpired refuses the redirect like the lookup would have.
pub struct RedirectService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    links: Arc<L>,
    clicks: Arc<C>,
}

impl<L, C> RedirectService<L, C>
where
    L: LinkRepository + ?Sized,
    C: ClickRepository + ?Sized,
{
    pub fn new(links: Arc<L>, clicks: Arc<C>) -> Self {
        Self { links, clicks }
    }

    /// Returns the original URL for `key`.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotFound`] - no active link matches `key`, or the link
    ///   was deactivated or deleted before the click was written
    /// - [`LinkError::Expired`] - the link's expiry is at or before now; no
    ///   click is recorded
    /// - [`LinkError::StoreUnavailable`] - the lookup itself failed
    pub async fn resolve(&self, key: &str, event: ClickEvent) -> Result<String, LinkError> {
        let Some(link) = self.links.find_active_by_key(key).await? else {
            metrics::counter!("shortlink_redirects_total", "outcome" => "not_found").increment(1);
            return Err(LinkError::NotFound(key.to_string()));
        };

        if link.is_expired() {
            metrics::counter!("shortlink_redirects_total", "outcome" => "expired").increment(1);
            return Err(LinkError::Expired(key.to_string()));
        }

        match self.clicks.record_click(link.id, event.into_new_click()).await {
            Ok(Some(click)) => {
                debug!(link_id = link.id, click_id = click.id, "Click recorded");
            }
            Ok(None) => {
                debug!(link_id = link.id, "Link left active state before click was recorded");
                if link.is_expired() {
                    metrics::counter!("shortlink_redirects_total", "outcome" => "expired")
                        .increment(1);
                    return Err(LinkError::Expired(key.to_string()));
                }
                metrics::counter!("shortlink_redirects_total", "outcome" => "not_found")
                    .increment(1);
                return Err(LinkError::NotFound(key.to_string()));
            }
            Err(e) => {
                metrics::counter!("shortlink_click_record_failures_total").increment(1);
                warn!(link_id = link.id, error = %e, "Failed to record click");
            }
        }

        metrics::counter!("shortlink_redirects_total", "outcome" => "redirected").increment(1);
        Ok(link.original_url)
    }
}
