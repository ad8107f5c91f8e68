//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::Owner;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Length of generated API tokens (~286 bits over the 62-char alphabet).
pub const TOKEN_LENGTH: usize = 48;

/// Generates a random API token.
pub fn generate_token() -> String {
    generate_code(TOKEN_LENGTH)
}

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when issuing tokens, so both sides must share the secret.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating API requests via Bearer tokens.
///
/// Every token identifies one owner; links created with it belong to that
/// owner. Tokens are stored only as HMAC hashes, so a database dump alone
/// cannot be used to authenticate.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and returns its owner.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure to do
    /// so is logged and does not reject the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the hash matches no token or the
    /// token has been revoked, [`AppError::Internal`] on store failures.
    pub async fn authenticate(&self, token: &str) -> Result<Owner, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let api_token = self
            .repository
            .find_active_by_hash(&token_hash)
            .await?
            .filter(|t| !t.is_revoked())
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid or revoked token"}),
                )
            })?;

        if let Err(e) = self.repository.update_last_used(api_token.id).await {
            warn!(token_id = api_token.id, error = %e, "Failed to update token last_used_at");
        }

        Ok(api_token.owner())
    }
}
