//! Access policy for protected screens.

use waypoint_core::AuthenticatedPrincipal;
use waypoint_infra::{SessionSlot, UserDirectory};

use crate::session::AuthSession;

/// What a protected screen requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any logged-in principal.
    Authenticated,
    /// A principal with `is_admin`.
    Admin,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The session is still restoring; show a placeholder, decide later.
    Pending,
    RedirectToLogin,
    Granted,
}

/// Decide whether a screen may be shown.
///
/// - No IO
/// - No panics
/// - Non-admins asking for an admin screen are sent to login, same as anonymous users
pub fn guard(
    loading: bool,
    principal: Option<&AuthenticatedPrincipal>,
    access: Access,
) -> AccessDecision {
    if loading {
        return AccessDecision::Pending;
    }
    match (principal, access) {
        (None, _) => AccessDecision::RedirectToLogin,
        (Some(p), Access::Admin) if !p.is_admin => AccessDecision::RedirectToLogin,
        (Some(_), _) => AccessDecision::Granted,
    }
}

impl<D, S> AuthSession<D, S>
where
    D: UserDirectory,
    S: SessionSlot,
{
    pub fn check(&self, access: Access) -> AccessDecision {
        guard(self.is_loading(), self.principal(), access)
    }
}
