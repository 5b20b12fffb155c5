//! Error taxonomy for admin operations.
//!
//! Three failure classes exist: rejected input (user-facing message,
//! nothing mutated), a referenced record that does not exist, and
//! storage read/write failures. Storage failures travel as plain
//! `anyhow` errors with context from the storage layer; the first two
//! are typed here so callers can tell them apart.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Input was rejected before any mutation. The message is suitable
    /// for direct display.
    #[error("{0}")]
    Validation(String),

    /// A record referenced by id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Shorthand for a validation failure as an `anyhow` error.
pub(crate) fn validation(message: impl Into<String>) -> anyhow::Error {
    DomainError::Validation(message.into()).into()
}

/// Shorthand for a missing-record failure as an `anyhow` error.
pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> anyhow::Error {
    DomainError::NotFound {
        entity,
        id: id.into(),
    }
    .into()
}
