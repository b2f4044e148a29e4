//! Auth session manager: the current principal, mirrored to a session slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use waypoint_core::{AuthenticatedPrincipal, Identifier};
use waypoint_infra::{SessionSlot, UserDirectory};

/// Slot key holding the JSON-serialised principal.
pub const SESSION_KEY: &str = "current_principal";

/// Read-only view of the session's loading flag.
///
/// Cloneable so a UI can poll it while a login is in flight.
#[derive(Debug, Clone)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Clears the loading flag when dropped, including when a login future is
/// dropped before it resolves.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Holds at most one authenticated principal.
///
/// # Lifecycle
/// - [`AuthSession::new`]: no principal, loading.
/// - [`AuthSession::initialize`]: restore from the slot (best effort), stop loading.
/// - [`AuthSession::login`] / [`AuthSession::logout`]: replace or clear the principal.
///
/// Persistence failures are logged and otherwise ignored: the in-memory
/// principal keeps working for the rest of the process.
pub struct AuthSession<D, S> {
    directory: D,
    slot: S,
    principal: Option<AuthenticatedPrincipal>,
    loading: Arc<AtomicBool>,
}

impl<D, S> AuthSession<D, S>
where
    D: UserDirectory,
    S: SessionSlot,
{
    pub fn new(directory: D, slot: S) -> Self {
        Self {
            directory,
            slot,
            principal: None,
            loading: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Restore a previously persisted principal.
    ///
    /// Missing, corrupt or unreadable state means "no session"; corrupt
    /// values are removed from the slot. Never fails.
    pub fn initialize(&mut self) {
        match self.slot.load(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthenticatedPrincipal>(&raw) {
                Ok(principal) => {
                    tracing::info!(principal_id = %principal.id, "restored persisted session");
                    self.principal = Some(principal);
                }
                Err(err) => {
                    tracing::warn!("discarding corrupt persisted session: {err}");
                    if let Err(err) = self.slot.remove(SESSION_KEY) {
                        tracing::warn!("failed to clear corrupt session: {err}");
                    }
                }
            },
            Ok(None) => {}
            Err(err) => tracing::warn!("session storage unavailable at startup: {err}"),
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Authenticate against the directory.
    ///
    /// Returns `None` for unknown identifiers, wrong secrets and backend
    /// failures alike; callers show one generic message. A successful login
    /// replaces any current principal.
    ///
    /// Input that is not exactly 11 digits (punctuation aside) is rejected
    /// without a directory call.
    pub async fn login(&mut self, identifier: &str, secret: &str) -> Option<AuthenticatedPrincipal> {
        let identifier = match Identifier::parse(identifier) {
            Ok(identifier) => identifier.formatted(),
            Err(err) => {
                tracing::info!("login rejected: {err}");
                return None;
            }
        };

        let result = {
            let _loading = LoadingGuard::raise(&self.loading);
            self.directory.authenticate(&identifier, secret).await
        };

        match result {
            Ok(Some(principal)) => {
                tracing::info!(principal_id = %principal.id, admin = principal.is_admin, "login succeeded");
                self.persist(&principal);
                self.principal = Some(principal.clone());
                Some(principal)
            }
            Ok(None) => {
                tracing::info!(identifier = %identifier, "login rejected");
                None
            }
            Err(err) => {
                tracing::warn!("login failed: {err}");
                None
            }
        }
    }

    /// Forget the current principal, in memory and (best effort) in the slot.
    pub fn logout(&mut self) {
        if let Some(principal) = self.principal.take() {
            tracing::info!(principal_id = %principal.id, "logged out");
        }
        if let Err(err) = self.slot.remove(SESSION_KEY) {
            tracing::warn!("failed to clear persisted session: {err}");
        }
    }

    pub fn principal(&self) -> Option<&AuthenticatedPrincipal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        LoadingFlag(Arc::clone(&self.loading))
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn persist(&self, principal: &AuthenticatedPrincipal) {
        let raw = match serde_json::to_string(principal) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("failed to serialise session: {err}");
                return;
            }
        };
        if let Err(err) = self.slot.store(SESSION_KEY, &raw) {
            tracing::warn!("failed to persist session: {err}");
        }
    }
}
