//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A lookup key mapped to a destination URL
//! - [`Click`] - One recorded visit of a short link
//! - [`Owner`] / [`ApiToken`] - The principal that owns links
//!
//! Creation inputs live next to the entities (`NewShortLink`, `NewClick`).

pub mod click;
pub mod link;
pub mod owner;

pub use click::{Click, DIRECT_REFERRER, NewClick, UNKNOWN_IP, UNKNOWN_USER_AGENT};
pub use link::{LinkQuery, NewShortLink, ShortLink};
pub use owner::{ApiToken, Owner};
