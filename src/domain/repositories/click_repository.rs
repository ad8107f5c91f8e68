//! Repository trait for click history.

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for recording and reading click history.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click to the link's history and increments its click count
    /// in one atomic store mutation.
    ///
    /// The mutation only applies to links that are still active and not
    /// expired; otherwise nothing is written and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on storage failures.
    async fn record_click(
        &self,
        link_id: i64,
        new_click: NewClick,
    ) -> Result<Option<Click>, StoreError>;

    /// Returns the full click history of a link in chronological order.
    async fn history(&self, link_id: i64) -> Result<Vec<Click>, StoreError>;
}
