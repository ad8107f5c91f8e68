//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod link_service;
pub mod redirect_service;

pub use analytics_service::{AnalyticsService, LinkAnalytics};
pub use auth_service::{AuthService, generate_token, hash_token};
pub use link_service::{LinkService, ShortenInput};
pub use redirect_service::RedirectService;
