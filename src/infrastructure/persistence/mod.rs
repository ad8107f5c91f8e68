//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookup and sweeping
//! - [`PgClickRepository`] - Atomic click append and history
//! - [`PgTokenRepository`] - API token storage and validation

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;

use crate::domain::repositories::StoreError;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return StoreError::Conflict {
                constraint: db_err.constraint().map(str::to_string),
            };
        }

        tracing::error!(error = %e, "Database error");
        StoreError::Unavailable(e.to_string())
    }
}
