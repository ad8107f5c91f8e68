//! Short link entity representing a lookup key to destination mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its ownership, lifecycle flags and click counter.
///
/// The lookup key a visitor supplies may match either [`ShortLink::code`] or
/// [`ShortLink::custom_alias`]. When a link is created with a custom alias the
/// two fields hold the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub owner_id: i64,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Returns true if `expires_at` is set and is not after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if `key` addresses this link.
    pub fn matches_key(&self, key: &str) -> bool {
        self.code == key || self.custom_alias.as_deref() == Some(key)
    }
}

/// Input data for inserting a new link.
///
/// The store assigns `id`, timestamps, `click_count = 0` and `active = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub code: String,
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub owner_id: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Listing parameters for an owner's links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkQuery {
    pub offset: i64,
    pub limit: i64,
    /// Case-insensitive substring matched against URL, code and alias.
    pub search: Option<String>,
}
