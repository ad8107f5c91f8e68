//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AnalyticsService, AuthService, LinkService, RedirectService};
use crate::config::Config;
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository, PgTokenRepository};

/// Service-level settings derived from [`Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub token_signing_secret: String,
    pub code_length: usize,
    pub code_max_attempts: usize,
    pub behind_proxy: bool,
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token_signing_secret: config.token_signing_secret.clone(),
            code_length: config.code_length,
            code_max_attempts: config.code_max_attempts,
            behind_proxy: config.behind_proxy,
        }
    }
}

/// Services behind trait objects so the same router serves either backend.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub redirect_service: Arc<RedirectService<dyn LinkRepository, dyn ClickRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn LinkRepository, dyn ClickRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        tokens: Arc<dyn TokenRepository>,
        settings: ServiceSettings,
    ) -> Self {
        let link_service = LinkService::new(links.clone(), settings.base_url)
            .with_code_policy(settings.code_length, settings.code_max_attempts);

        Self {
            link_service: Arc::new(link_service),
            redirect_service: Arc::new(RedirectService::new(links.clone(), clicks.clone())),
            analytics_service: Arc::new(AnalyticsService::new(links, clicks)),
            auth_service: Arc::new(AuthService::new(tokens, settings.token_signing_secret)),
            behind_proxy: settings.behind_proxy,
        }
    }

    /// State backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>, settings: ServiceSettings) -> Self {
        Self::new(
            Arc::new(PgLinkRepository::new(pool.clone())),
            Arc::new(PgClickRepository::new(pool.clone())),
            Arc::new(PgTokenRepository::new(pool)),
            settings,
        )
    }

    /// State backed by a single in-process store.
    pub fn in_memory(store: Arc<MemoryStore>, settings: ServiceSettings) -> Self {
        Self::new(store.clone(), store.clone(), store, settings)
    }
}
