//! Background deletion of links that expired long ago.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// Periodically removes links whose expiry lies more than `retention` in the
/// past. Links inside the retention window keep answering 410 Gone.
///
/// Runs until the task is aborted. Store failures are logged and retried on
/// the next tick.
pub async fn run_expiry_sweeper<L>(
    service: Arc<LinkService<L>>,
    interval: Duration,
    retention: Duration,
) where
    L: LinkRepository + ?Sized,
{
    let retention = match chrono::Duration::from_std(retention) {
        Ok(retention) => retention,
        Err(e) => {
            warn!(error = %e, "Retention out of range, expiry sweeper not started");
            return;
        }
    };

    info!(
        interval_secs = interval.as_secs(),
        retention_secs = retention.num_seconds(),
        "Expiry sweeper started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match service.sweep_expired(retention).await {
            Ok(0) => debug!("No expired links to sweep"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Expiry sweep failed"),
        }
    }
}
