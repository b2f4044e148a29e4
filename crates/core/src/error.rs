//! Parse failures for the domain's value types.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Raised when loose input does not make a valid domain value.
///
/// Messages are meant for logs; forms map these to their own field messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("identifier must have 11 digits, found {found}")]
    IdentifierLength { found: usize },

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("invalid destination url: {0}")]
    InvalidDestination(String),

    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}
