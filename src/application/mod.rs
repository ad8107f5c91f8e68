//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the API used by HTTP
//! handlers, the expiry sweeper and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Code assignment, link creation and management
//! - [`services::redirect_service::RedirectService`] - Code resolution and click recording
//! - [`services::analytics_service::AnalyticsService`] - Per-link click history
//! - [`services::auth_service::AuthService`] - API token authentication
//!
//! [`expiry_sweeper`] runs the link service's sweep on a fixed interval.

pub mod expiry_sweeper;
pub mod services;
