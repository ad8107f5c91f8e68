//! Request metadata captured for click tracking.

use crate::domain::entities::{DIRECT_REFERRER, NewClick, UNKNOWN_IP, UNKNOWN_USER_AGENT};

/// Client information taken from a redirect request.
///
/// All fields are optional because headers may be missing or unreadable.
/// [`ClickEvent::into_new_click`] substitutes the sentinel values so the
/// stored history never contains absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// Blank header values are treated as missing.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    ///     None,
    /// );
    /// assert_eq!(event.into_new_click().referrer, "direct");
    /// ```
    pub fn new(ip: Option<String>, user_agent: Option<&str>, referrer: Option<&str>) -> Self {
        Self {
            ip: ip.filter(|s| !s.trim().is_empty()),
            user_agent: non_blank(user_agent),
            referrer: non_blank(referrer),
        }
    }

    /// Converts into the store input, replacing missing fields with sentinels.
    pub fn into_new_click(self) -> NewClick {
        NewClick {
            ip: self.ip.unwrap_or_else(|| UNKNOWN_IP.to_string()),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string()),
            referrer: self.referrer.unwrap_or_else(|| DIRECT_REFERRER.to_string()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
