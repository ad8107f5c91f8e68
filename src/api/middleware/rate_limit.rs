//! Per-client rate limiting using a keyed token bucket.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::utils::client_ip::client_ip;

/// Limits for one group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub per_second: u32,
    pub burst: u32,
    /// Key clients by `X-Forwarded-For` / `X-Real-IP` instead of the peer.
    pub behind_proxy: bool,
}

impl RateLimitSettings {
    /// Stricter limits for authenticated endpoints: 1 request per second,
    /// burst of 10.
    pub fn secure(&self) -> Self {
        Self {
            per_second: 1,
            burst: 10,
            behind_proxy: self.behind_proxy,
        }
    }
}

impl Default for RateLimitSettings {
    /// 2 requests per second, burst of 100.
    fn default() -> Self {
        Self {
            per_second: 2,
            burst: 100,
            behind_proxy: false,
        }
    }
}

impl From<&Config> for RateLimitSettings {
    fn from(config: &Config) -> Self {
        Self {
            per_second: config.rate_limit_per_second,
            burst: config.rate_limit_burst,
            behind_proxy: config.behind_proxy,
        }
    }
}

/// Shared limiter state for [`layer`].
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    behind_proxy: bool,
}

impl ClientRateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        let per_second = NonZeroU32::new(settings.per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(settings.burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            behind_proxy: settings.behind_proxy,
        }
    }
}

/// Tracked clients before idle buckets are pruned.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Rejects requests over the client's quota with `429 Too Many Requests`.
///
/// The client key is the socket peer IP, or the first forwarded address when
/// the service runs behind a trusted proxy.
///
/// # Example
///
/// ```rust,ignore
/// let limiter = ClientRateLimiter::new(RateLimitSettings::default());
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .layer(middleware::from_fn_with_state(limiter, rate_limit::layer));
/// ```
pub async fn layer(
    State(limiter): State<ClientRateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));

    let key = client_ip(req.headers(), peer, limiter.behind_proxy);

    if limiter.limiter.len() > MAX_TRACKED_CLIENTS {
        limiter.limiter.retain_recent();
    }

    if limiter.limiter.check_key(&key).is_err() {
        tracing::debug!(client = %key, "Rate limit exceeded");
        return Err(AppError::too_many_requests(
            "Too many requests",
            json!({"reason": "rate_limited"}),
        ));
    }

    Ok(next.run(req).await)
}
