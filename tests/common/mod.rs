#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

use shortlink::api::middleware::rate_limit::RateLimitSettings;
use shortlink::application::services::hash_token;
use shortlink::domain::entities::{NewShortLink, ShortLink};
use shortlink::domain::repositories::{LinkRepository, TokenRepository};
use shortlink::infrastructure::memory::MemoryStore;
use shortlink::routes::api_router;
use shortlink::state::{AppState, ServiceSettings};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

/// Injects a fixed peer address, as `into_make_service_with_connect_info`
/// does in production.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        base_url: BASE_URL.to_string(),
        token_signing_secret: SIGNING_SECRET.to_string(),
        code_length: 6,
        code_max_attempts: 10,
        behind_proxy: false,
    }
}

/// Limits high enough that ordinary tests never hit them.
pub fn relaxed_limits() -> RateLimitSettings {
    RateLimitSettings {
        per_second: 1_000,
        burst: 1_000,
        behind_proxy: false,
    }
}

pub fn create_test_state(store: Arc<MemoryStore>) -> AppState {
    AppState::in_memory(store, test_settings())
}

/// Full router (auth, rate limiting, tracing) over `store`.
pub fn make_app(store: Arc<MemoryStore>, limits: RateLimitSettings) -> Router {
    api_router(create_test_state(store), limits, limits).layer(MockConnectInfoLayer)
}

pub fn make_server(store: Arc<MemoryStore>) -> TestServer {
    TestServer::new(make_app(store, relaxed_limits())).unwrap()
}

/// Registers an API token and returns the raw value for `Authorization`.
pub async fn create_owner(store: &MemoryStore, name: &str) -> String {
    let token = format!("{name}-token");
    store
        .create_token(name, &hash_token(SIGNING_SECRET, &token))
        .await
        .unwrap();
    token
}

pub async fn create_test_link(
    store: &MemoryStore,
    owner_token: &str,
    code: &str,
    url: &str,
    expires_at: Option<DateTime<Utc>>,
) -> ShortLink {
    let owner = store
        .find_active_by_hash(&hash_token(SIGNING_SECRET, owner_token))
        .await
        .unwrap()
        .expect("owner token must exist");

    store
        .insert(NewShortLink {
            code: code.to_string(),
            original_url: url.to_string(),
            custom_alias: None,
            owner_id: owner.id,
            expires_at,
        })
        .await
        .unwrap()
}
