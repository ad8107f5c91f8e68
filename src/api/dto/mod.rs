//! Data Transfer Objects for API requests and responses.
//!
//! JSON field names are camelCase. Request DTOs use `validator` for size
//! bounds; domain rules are enforced by the services.

pub mod analytics;
pub mod health;
pub mod link;
pub mod pagination;
pub mod shorten;
