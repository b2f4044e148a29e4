//! Infrastructure layer: remote directory clients, session persistence, config.

pub mod config;
pub mod directory;
pub mod session_slot;

pub use config::{AppConfig, ConfigError, DirectoryConfig};
pub use directory::{DirectoryError, HttpDirectory, InMemoryDirectory, UserDirectory};
pub use session_slot::{FileSessionSlot, InMemorySessionSlot, PersistenceError, SessionSlot};
