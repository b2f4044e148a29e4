//! Persisted client-side key/value slot for the session.
//!
//! Mirrors what a browser's local storage offers: string values under string
//! keys, which may be missing, corrupt, or unavailable at any time.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileSessionSlot;
pub use in_memory::InMemorySessionSlot;

/// Storage failure (unavailable, full, permission denied).
///
/// Callers log these and carry on; they never block in-memory session state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key/value persistence for session state.
pub trait SessionSlot: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn store(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

impl<S> SessionSlot for Arc<S>
where
    S: SessionSlot + ?Sized,
{
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).store(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}
