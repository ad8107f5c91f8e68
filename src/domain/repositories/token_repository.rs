//! Repository trait for API token authentication.

use crate::domain::entities::ApiToken;
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for API token management.
///
/// Handles token lookup, creation, and revocation. Tokens are stored as
/// HMAC-SHA256 hashes; raw tokens never reach the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_token.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Finds a non-revoked token by its hash.
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<ApiToken>, StoreError>;

    /// Updates the `last_used_at` timestamp for a token.
    async fn update_last_used(&self, token_id: i64) -> Result<(), StoreError>;

    /// Creates a new API token.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the name or hash already exists.
    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, StoreError>;

    /// Lists all tokens, newest first.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, StoreError>;

    /// Finds a token by its database ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, StoreError>;

    /// Finds a token by its name.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, StoreError>;

    /// Revokes a token, preventing further authentication.
    ///
    /// Returns `Ok(false)` if the token does not exist or is already revoked.
    async fn revoke_token(&self, id: i64) -> Result<bool, StoreError>;
}
