//! Click entity representing a single recorded redirect.

use chrono::{DateTime, Utc};

/// Recorded when the client address is not known.
pub const UNKNOWN_IP: &str = "unknown";
/// Recorded when the request carries no `User-Agent`.
pub const UNKNOWN_USER_AGENT: &str = "unknown";
/// Recorded when the request carries no `Referer`.
pub const DIRECT_REFERRER: &str = "direct";

/// A click event stored in a link's history.
///
/// Every field is populated: missing request metadata is replaced by the
/// sentinels above before it reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
    pub referrer: String,
}

/// Input data for appending a click to a link's history.
///
/// Built from a [`crate::domain::click_event::ClickEvent`]; the timestamp is
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub ip: String,
    pub user_agent: String,
    pub referrer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(UNKNOWN_IP, "unknown");
        assert_eq!(UNKNOWN_USER_AGENT, "unknown");
        assert_eq!(DIRECT_REFERRER, "direct");
    }
}
