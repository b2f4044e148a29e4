//! `waypoint-auth`: client-side authentication session and access policy.
//!
//! The session is an explicit object: create it with [`AuthSession::new`],
//! call [`AuthSession::initialize`] once at startup, and pass it by reference
//! to whatever needs the current principal.

pub mod guard;
pub mod login;
pub mod session;

pub use guard::{Access, AccessDecision, guard};
pub use login::{Landing, LoginError, landing_for, sign_in};
pub use session::{AuthSession, LoadingFlag, SESSION_KEY};
