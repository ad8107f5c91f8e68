//! Short code generation and custom alias validation.
//!
//! Codes are drawn from a cryptographically secure generator; aliases are
//! checked against a fixed charset/length policy.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// The 62-character alphanumeric alphabet used for generated codes.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub const ALIAS_MIN_LENGTH: usize = 3;
pub const ALIAS_MAX_LENGTH: usize = 20;

/// Aliases that would be shadowed by fixed routes.
const RESERVED_ALIASES: &[&str] = &["shorten", "urls", "health"];

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").expect("alias pattern is valid"));

/// Generates a random code of exactly `length` characters.
///
/// Each character is sampled uniformly from [`ALPHABET`] using the thread-local
/// ChaCha generator, which is seeded from the operating system and is
/// cryptographically secure.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

/// Returns true iff `alias` is 3-20 characters of `[a-zA-Z0-9_-]`.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_alias("my-link_2024"));
/// assert!(!is_valid_alias("ab"));          // Too short
/// assert!(!is_valid_alias("has space"));   // Invalid character
/// ```
pub fn is_valid_alias(alias: &str) -> bool {
    ALIAS_REGEX.is_match(alias)
}

/// Returns true if `alias` collides with a fixed route.
pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_has_62_unique_characters() {
        let unique: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(ALPHABET.len(), 62);
        assert_eq!(unique.len(), 62);
        assert!(ALPHABET.iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_code_has_requested_length() {
        for length in [1, 4, 6, 12, 16] {
            assert_eq!(generate_code(length).len(), length);
        }
    }

    #[test]
    fn test_generate_code_default_is_alphanumeric() {
        for _ in 0..500 {
            let code = generate_code(DEFAULT_CODE_LENGTH);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_generate_code_covers_alphabet() {
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.extend(generate_code(DEFAULT_CODE_LENGTH).bytes());
        }
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn test_generate_code_zero_length() {
        assert!(generate_code(0).is_empty());
    }

    #[test]
    fn test_valid_alias_boundaries() {
        assert!(is_valid_alias("abc"));
        assert!(is_valid_alias(&"a".repeat(20)));
        assert!(!is_valid_alias("ab"));
        assert!(!is_valid_alias(&"a".repeat(21)));
        assert!(!is_valid_alias(""));
    }

    #[test]
    fn test_valid_alias_every_allowed_character() {
        let allowed = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";
        for chunk in allowed.as_bytes().chunks(20) {
            let alias = std::str::from_utf8(chunk).unwrap();
            if alias.len() >= ALIAS_MIN_LENGTH {
                assert!(is_valid_alias(alias), "{alias} should be valid");
            }
        }
        assert!(is_valid_alias("---"));
        assert!(is_valid_alias("___"));
        assert!(is_valid_alias("My_Link-2024"));
    }

    #[test]
    fn test_invalid_alias_characters() {
        for alias in [
            "has space",
            "dot.ted",
            "slash/ed",
            "q?uery",
            "percent%20",
            "emoji😀x",
            "ümlaut",
            "tab\tbed",
            "new\nline",
        ] {
            assert!(!is_valid_alias(alias), "{alias:?} should be invalid");
        }
    }

    #[test]
    fn test_alias_length_counts_characters_not_padding() {
        assert!(!is_valid_alias("abc\n"));
        assert!(!is_valid_alias(" abc"));
    }

    #[test]
    fn test_reserved_aliases() {
        assert!(is_reserved("shorten"));
        assert!(is_reserved("URLS"));
        assert!(is_reserved("health"));
        assert!(!is_reserved("promo"));
    }
}
