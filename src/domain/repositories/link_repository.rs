//! Repository trait for short link data access.

use crate::domain::entities::{LinkQuery, NewShortLink, ShortLink};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the code or custom alias is already
    /// in use. Callers treat this as the authoritative duplicate signal.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError>;

    /// Returns true if any link has `code` equal to `code`.
    async fn code_exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Returns true if any link has `code` or `custom_alias` equal to `key`.
    async fn key_in_use(&self, key: &str) -> Result<bool, StoreError>;

    /// Finds an active link whose code or custom alias equals `key`.
    ///
    /// Expired links are still returned so callers can tell expiry apart from
    /// absence.
    async fn find_active_by_key(&self, key: &str) -> Result<Option<ShortLink>, StoreError>;

    /// Finds a link by id, restricted to `owner_id`.
    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<ShortLink>, StoreError>;

    /// Lists an owner's links, newest first.
    async fn list_owned(
        &self,
        owner_id: i64,
        query: LinkQuery,
    ) -> Result<Vec<ShortLink>, StoreError>;

    /// Counts an owner's links matching the optional search term.
    async fn count_owned(&self, owner_id: i64, search: Option<String>)
    -> Result<i64, StoreError>;

    /// Deletes a link owned by `owner_id` together with its click history.
    ///
    /// Returns `Ok(false)` if no such link exists.
    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;

    /// Deletes links whose `expires_at` is before `cutoff`.
    ///
    /// Returns the number of deleted links.
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
