use std::sync::Arc;

use waypoint_auth::{Access, AccessDecision, AuthSession};
use waypoint_console::{AdminConsole, ConsoleError};
use waypoint_infra::{
    AppConfig, DirectoryError, FileSessionSlot, HttpDirectory, SessionSlot, UserDirectory,
};

/// Everything a running client needs: one directory handle and one session.
///
/// The directory is shared between the session and any console opened from
/// this context.
pub struct AppContext<D, S> {
    directory: Arc<D>,
    session: AuthSession<Arc<D>, S>,
}

impl AppContext<HttpDirectory, FileSessionSlot> {
    /// Build the production wiring from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, DirectoryError> {
        let directory = HttpDirectory::new(config.directory.clone())?;
        let slot = FileSessionSlot::new(config.session_dir.clone());
        tracing::debug!(
            base_url = config.directory.base_url.as_str(),
            session_dir = %config.session_dir.display(),
            "application context ready"
        );
        Ok(Self::new(directory, slot))
    }
}

impl<D, S> AppContext<D, S>
where
    D: UserDirectory,
    S: SessionSlot,
{
    pub fn new(directory: D, slot: S) -> Self {
        let directory = Arc::new(directory);
        let session = AuthSession::new(Arc::clone(&directory), slot);
        Self { directory, session }
    }

    pub fn session(&self) -> &AuthSession<Arc<D>, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AuthSession<Arc<D>, S> {
        &mut self.session
    }

    pub fn directory(&self) -> &Arc<D> {
        &self.directory
    }

    /// Open the admin console for the signed-in principal.
    ///
    /// Refused unless the session is settled and the principal is an admin.
    pub fn open_console(&self) -> Result<AdminConsole<Arc<D>>, ConsoleError> {
        match (self.session.check(Access::Admin), self.session.principal()) {
            (AccessDecision::Granted, Some(principal)) => {
                AdminConsole::open(principal, Arc::clone(&self.directory))
            }
            _ => Err(ConsoleError::Forbidden),
        }
    }
}
