//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted; validation only decides
//! whether a string is an acceptable redirect target.

use url::Url;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates a destination URL.
///
/// # Rules
///
/// 1. Must parse as an absolute URL
/// 2. Scheme must be `http` or `https` (rejects `javascript:`, `data:`, `file:` ...)
/// 3. Must have a non-empty host
///
/// Leading and trailing whitespace is rejected rather than trimmed, so the
/// stored value is always exactly what was validated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/page").is_ok());
/// assert!(validate_url("ftp://example.com").is_err());
/// assert!(validate_url("example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim() != input {
        return Err(UrlValidationError::InvalidFormat(
            "surrounding whitespace".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
