//! Client address extraction for click tracking.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the client IP for a request.
///
/// When `behind_proxy` is true the first address in `X-Forwarded-For`, then
/// `X-Real-IP`, takes precedence over the socket peer. Header values that do
/// not parse as an IP address are ignored.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
/// let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
///
/// assert_eq!(client_ip(&headers, peer, true), "203.0.113.7".parse::<IpAddr>().unwrap());
/// assert_eq!(client_ip(&headers, peer, false), peer.ip());
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> IpAddr {
    if behind_proxy && let Some(ip) = forwarded_for(headers).or_else(|| real_ip(headers)) {
        return ip;
    }

    peer.ip()
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers.get("x-real-ip")?.to_str().ok()?.trim().parse().ok()
}
