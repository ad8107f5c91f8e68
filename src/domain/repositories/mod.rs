//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure`. Mock implementations are generated via `mockall`
//! for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage and lookup
//! - [`ClickRepository`] - Atomic click append and history
//! - [`TokenRepository`] - API token authentication
//!
//! All operations fail with [`StoreError`].

pub mod click_repository;
pub mod link_repository;
pub mod store_error;
pub mod token_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use store_error::StoreError;
pub use token_repository::TokenRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
