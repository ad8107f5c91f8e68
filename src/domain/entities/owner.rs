//! Owner principal and the API token that identifies it.

use chrono::{DateTime, Utc};

/// The authenticated principal that creates and manages links.
///
/// Inserted into request extensions by [`crate::api::middleware::auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: i64,
    pub name: String,
}

/// API token entity with metadata.
///
/// Only the HMAC-SHA256 of the raw token is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    /// Returns true if the token has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// The owner this token authenticates as.
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.id,
            name: self.name.clone(),
        }
    }
}
