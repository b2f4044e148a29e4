//! `waypoint-console`: admin management of user records.
//!
//! - [`validate`]: field rules and the identifier uniqueness check
//! - [`form`]: editable form state, including the auto-derived secret
//! - [`console`]: list reconciliation against the remote directory

pub mod console;
pub mod error;
pub mod form;
pub mod validate;
pub mod view;

pub use console::AdminConsole;
pub use error::ConsoleError;
pub use form::RecordForm;
pub use validate::{Field, RecordDraft, ValidationErrors, validate, validate_fields};
pub use view::RecordView;
