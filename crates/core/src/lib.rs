//! `waypoint-core`: domain model for the user directory.
//!
//! This crate contains **pure domain** types (no IO, no transport concerns):
//! identifiers, roles, destination URLs and the record/principal shapes that
//! travel between the client and the remote directory.

pub mod destination;
pub mod error;
pub mod id;
pub mod identifier;
pub mod record;
pub mod role;
pub mod value_object;

pub use destination::DestinationUrl;
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use identifier::{Identifier, format_identifier, strip_non_digits};
pub use record::{AuthenticatedPrincipal, NewUserRecord, UserPatch, UserRecord};
pub use role::Role;
pub use value_object::ValueObject;
