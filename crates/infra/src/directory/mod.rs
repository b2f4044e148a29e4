//! Remote user directory: the backend that owns records and checks secrets.

pub mod http;
pub mod in_memory;
pub mod r#trait;

pub use http::HttpDirectory;
pub use in_memory::InMemoryDirectory;
pub use r#trait::{DirectoryError, UserDirectory};
