use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use waypoint_core::{
    AuthenticatedPrincipal, Identifier, NewUserRecord, RecordId, UserPatch, UserRecord,
};

use super::r#trait::{DirectoryError, UserDirectory};

/// In-memory user directory.
///
/// Intended for tests/dev. Behaves like the remote table: ids and timestamps
/// are assigned here, identifiers are unique, and `list` returns newest first.
/// [`InMemoryDirectory::set_offline`] makes every call fail, to exercise the
/// callers' failure paths.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    records: RwLock<Vec<UserRecord>>,
    offline: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the client-facing checks.
    pub fn seed(&self, new: NewUserRecord) -> UserRecord {
        let record = UserRecord::from_new(RecordId::new(), new, Utc::now());
        if let Ok(mut rows) = self.records.write() {
            rows.insert(0, record.clone());
        }
        record
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the stored rows (server view).
    pub fn snapshot(&self) -> Vec<UserRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    fn ensure_online(&self) -> Result<(), DirectoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("directory is offline".to_string()));
        }
        Ok(())
    }

    fn poisoned() -> DirectoryError {
        DirectoryError::Unavailable("lock poisoned".to_string())
    }

    fn identifier_taken(rows: &[UserRecord], identifier: &Identifier, exclude: Option<RecordId>) -> bool {
        rows.iter()
            .any(|r| &r.identifier == identifier && Some(r.id) != exclude)
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Option<AuthenticatedPrincipal>, DirectoryError> {
        self.ensure_online()?;

        let Ok(identifier) = Identifier::parse(identifier) else {
            return Ok(None);
        };

        let rows = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(rows
            .iter()
            .find(|r| r.identifier == identifier && r.secret == secret)
            .map(UserRecord::principal))
    }

    async fn list(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        self.ensure_online()?;
        let rows = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(rows.clone())
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, DirectoryError> {
        self.ensure_online()?;
        let mut rows = self.records.write().map_err(|_| Self::poisoned())?;

        if Self::identifier_taken(&rows, &record.identifier, None) {
            return Err(DirectoryError::DuplicateIdentifier(record.identifier));
        }

        let stored = UserRecord::from_new(RecordId::new(), record, Utc::now());
        rows.insert(0, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: RecordId, patch: UserPatch) -> Result<UserRecord, DirectoryError> {
        self.ensure_online()?;
        let mut rows = self.records.write().map_err(|_| Self::poisoned())?;

        if let Some(identifier) = &patch.identifier {
            if Self::identifier_taken(&rows, identifier, Some(id)) {
                return Err(DirectoryError::DuplicateIdentifier(identifier.clone()));
            }
        }

        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DirectoryError::NotFound(id))?;
        row.apply(&patch, Utc::now());
        Ok(row.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<(), DirectoryError> {
        self.ensure_online()?;
        let mut rows = self.records.write().map_err(|_| Self::poisoned())?;

        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(DirectoryError::NotFound(id));
        }
        Ok(())
    }

    async fn exists_by_identifier(
        &self,
        identifier: &Identifier,
        exclude: Option<RecordId>,
    ) -> Result<bool, DirectoryError> {
        self.ensure_online()?;
        let rows = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(Self::identifier_taken(&rows, identifier, exclude))
    }
}
