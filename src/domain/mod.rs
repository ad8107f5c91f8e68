//! Domain layer containing business entities and logic.
//!
//! Defines entities and repository interfaces independent of infrastructure
//! concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Request metadata captured on redirect
//!
//! # Click Recording Flow
//!
//! 1. The redirect handler builds a [`click_event::ClickEvent`] from the request
//! 2. [`crate::application::services::RedirectService`] resolves the key
//! 3. The event is appended via [`repositories::ClickRepository::record_click`],
//!    which bumps the link's counter in the same write

pub mod click_event;
pub mod entities;
pub mod repositories;
