//! Error type shared by all repository traits.

/// Failure reported by a repository.
///
/// Persistence implementations translate their driver errors into this type so
/// that services never see raw storage-layer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write. This is the authoritative
    /// duplicate signal for codes and aliases.
    #[error("unique constraint violation ({})", constraint.as_deref().unwrap_or("unknown"))]
    Conflict { constraint: Option<String> },

    /// Connection, timeout or any other storage failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true for unique constraint violations.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
