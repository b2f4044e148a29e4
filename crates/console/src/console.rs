//! Admin console: the local record list, kept in step with the directory.

use waypoint_core::{AuthenticatedPrincipal, RecordId, UserPatch, UserRecord};
use waypoint_infra::UserDirectory;

use crate::error::ConsoleError;
use crate::validate::{RecordDraft, validate};
use crate::view::RecordView;

/// Record management on behalf of an admin principal.
///
/// # Invariants
/// - The local list changes only after the directory confirms a write.
/// - The last admin in the list can be neither deleted nor demoted.
pub struct AdminConsole<D> {
    directory: D,
    records: Vec<UserRecord>,
    loading: bool,
}

impl<D> AdminConsole<D>
where
    D: UserDirectory,
{
    /// Open the console for `principal`. Non-admins are refused.
    ///
    /// The list starts empty; call [`AdminConsole::refresh`] to load it.
    pub fn open(principal: &AuthenticatedPrincipal, directory: D) -> Result<Self, ConsoleError> {
        if !principal.is_admin {
            tracing::warn!(principal_id = %principal.id, "non-admin tried to open the console");
            return Err(ConsoleError::Forbidden);
        }
        Ok(Self {
            directory,
            records: Vec::new(),
            loading: false,
        })
    }

    /// Replace the local list with the directory's.
    pub async fn refresh(&mut self) -> Result<(), ConsoleError> {
        self.loading = true;
        let result = self.directory.list().await;
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "refreshed user records");
                self.records = records;
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load user records: {err}");
                Err(err.into())
            }
        }
    }

    /// Validate and create a record; on success it goes to the top of the list.
    pub async fn create(&mut self, draft: &RecordDraft) -> Result<UserRecord, ConsoleError> {
        let record = validate(&self.directory, draft, None).await?;

        let created = self.directory.create(record).await.map_err(|err| {
            tracing::error!("failed to create user record: {err}");
            ConsoleError::from(err)
        })?;

        tracing::info!(record_id = %created.id, "user record created");
        self.records.insert(0, created.clone());
        Ok(created)
    }

    /// Validate and update the record `id`, replacing it in place.
    pub async fn update(&mut self, id: RecordId, draft: &RecordDraft) -> Result<UserRecord, ConsoleError> {
        let existing = self.get(id).cloned().ok_or(ConsoleError::NotFound(id))?;
        let record = validate(&self.directory, draft, Some(&existing)).await?;

        if existing.is_admin && !record.is_admin && self.admin_count() == 1 {
            return Err(ConsoleError::LastAdmin);
        }

        let updated = self
            .directory
            .update(id, UserPatch::from(record))
            .await
            .map_err(|err| {
                tracing::error!(record_id = %id, "failed to update user record: {err}");
                ConsoleError::from(err)
            })?;

        tracing::info!(record_id = %id, "user record updated");
        if let Some(slot) = self.records.iter_mut().find(|r| r.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete the record `id`. The only admin is never deleted.
    pub async fn delete(&mut self, id: RecordId) -> Result<(), ConsoleError> {
        if !self.records.iter().any(|r| r.id == id) {
            return Err(ConsoleError::NotFound(id));
        }
        if !self.can_delete(id) {
            return Err(ConsoleError::LastAdmin);
        }

        self.directory.delete(id).await.map_err(|err| {
            tracing::error!(record_id = %id, "failed to delete user record: {err}");
            ConsoleError::from(err)
        })?;

        tracing::info!(record_id = %id, "user record deleted");
        self.records.retain(|r| r.id != id);
        Ok(())
    }

    /// `false` when `id` is the only admin left (or not in the list).
    pub fn can_delete(&self, id: RecordId) -> bool {
        match self.get(id) {
            Some(record) => !record.is_admin || self.admin_count() > 1,
            None => false,
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn views(&self) -> Vec<RecordView> {
        self.records.iter().map(RecordView::from).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn admin_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_admin).count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use waypoint_core::{DestinationUrl, Identifier, NewUserRecord, Role};
    use waypoint_infra::{DirectoryError, InMemoryDirectory};

    use crate::validate::Field;

    fn new_record(name: &str, identifier: &str, is_admin: bool) -> NewUserRecord {
        NewUserRecord {
            display_name: name.to_string(),
            identifier: Identifier::parse(identifier).unwrap(),
            secret: "secret".to_string(),
            role: Role::Manager,
            destination_url: DestinationUrl::parse("https://example.com/home").unwrap(),
            is_admin,
        }
    }

    fn draft(name: &str, identifier: &str, is_admin: bool) -> RecordDraft {
        RecordDraft {
            display_name: name.to_string(),
            identifier: identifier.to_string(),
            role: "operator".to_string(),
            secret: "1234".to_string(),
            destination_url: "https://example.com/next".to_string(),
            is_admin,
        }
    }

    async fn console_with(
        seed: &[(&str, &str, bool)],
    ) -> (AdminConsole<Arc<InMemoryDirectory>>, Arc<InMemoryDirectory>, Vec<UserRecord>) {
        let dir = Arc::new(InMemoryDirectory::new());
        let seeded: Vec<UserRecord> = seed
            .iter()
            .map(|(name, id, admin)| dir.seed(new_record(name, id, *admin)))
            .collect();
        let admin = seeded
            .iter()
            .find(|r| r.is_admin)
            .map(UserRecord::principal)
            .unwrap();

        let mut console = AdminConsole::open(&admin, Arc::clone(&dir)).unwrap();
        console.refresh().await.unwrap();
        (console, dir, seeded)
    }

    #[tokio::test]
    async fn non_admin_cannot_open_console() {
        let dir = InMemoryDirectory::new();
        let user = dir.seed(new_record("Bia Lima", "11122233344", false));
        assert!(matches!(
            AdminConsole::open(&user.principal(), dir),
            Err(ConsoleError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn refresh_loads_newest_first() {
        let (console, _dir, seeded) = console_with(&[
            ("Ana Souza", "12345678901", true),
            ("Bia Lima", "11122233344", false),
        ])
        .await;
        assert_eq!(console.len(), 2);
        assert_eq!(console.records()[0].id, seeded[1].id);
        assert!(!console.is_loading());
    }

    #[tokio::test]
    async fn last_admin_cannot_be_deleted() {
        let (mut console, dir, seeded) = console_with(&[
            ("Ana Souza", "12345678901", true),
            ("Bia Lima", "11122233344", false),
        ])
        .await;
        let admin = seeded[0].id;

        assert!(!console.can_delete(admin));
        assert!(matches!(console.delete(admin).await, Err(ConsoleError::LastAdmin)));
        assert_eq!(console.len(), 2);
        assert_eq!(dir.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn non_admin_and_one_of_two_admins_can_be_deleted() {
        let (mut console, dir, seeded) = console_with(&[
            ("Ana Souza", "12345678901", true),
            ("Bia Lima", "11122233344", false),
            ("Caio Reis", "55566677788", true),
        ])
        .await;

        console.delete(seeded[1].id).await.unwrap();
        console.delete(seeded[0].id).await.unwrap();

        assert_eq!(console.len(), 1);
        assert_eq!(console.admin_count(), 1);
        assert!(!console.can_delete(seeded[2].id));
        assert_eq!(dir.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn create_prepends_confirmed_record() {
        let (mut console, _dir, _) = console_with(&[("Ana Souza", "12345678901", true)]).await;

        let created = console.create(&draft("Davi Rocha", "98765432100", false)).await.unwrap();
        assert_eq!(console.records()[0].id, created.id);
        assert_eq!(created.identifier.formatted(), "987.654.321-00");
        assert_eq!(created.role, Some(Role::Operator));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_directory() {
        let (mut console, dir, _) = console_with(&[("Ana Souza", "12345678901", true)]).await;

        let err = console
            .create(&draft("Davi Rocha", "123.456.789-01", false))
            .await
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get(Field::Identifier), Some("this identifier is already registered"));
        assert_eq!(dir.snapshot().len(), 1);
        assert_eq!(console.len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_record_in_place() {
        let (mut console, _dir, seeded) = console_with(&[
            ("Ana Souza", "12345678901", true),
            ("Bia Lima", "11122233344", false),
        ])
        .await;
        let target = seeded[1].id;

        let mut edit = RecordDraft::from_record(&seeded[1]);
        edit.display_name = "Beatriz Lima".to_string();
        let updated = console.update(target, &edit).await.unwrap();

        assert_eq!(updated.display_name, "Beatriz Lima");
        assert_eq!(console.get(target).unwrap().display_name, "Beatriz Lima");
        assert_eq!(console.len(), 2);
    }

    #[tokio::test]
    async fn last_admin_cannot_be_demoted() {
        let (mut console, _dir, seeded) = console_with(&[("Ana Souza", "12345678901", true)]).await;

        let mut edit = RecordDraft::from_record(&seeded[0]);
        edit.is_admin = false;
        assert!(matches!(
            console.update(seeded[0].id, &edit).await,
            Err(ConsoleError::LastAdmin)
        ));
        assert!(console.records()[0].is_admin);
    }

    #[tokio::test]
    async fn remote_failure_leaves_list_untouched() {
        let (mut console, dir, seeded) = console_with(&[
            ("Ana Souza", "12345678901", true),
            ("Bia Lima", "11122233344", false),
        ])
        .await;
        let before = console.records().to_vec();
        dir.set_offline(true);

        let err = console.delete(seeded[1].id).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Remote(_)));
        assert_eq!(
            err.user_message(),
            "The operation could not be completed. Please try again."
        );

        let mut edit = RecordDraft::from_record(&seeded[1]);
        edit.display_name = "Beatriz Lima".to_string();
        assert!(matches!(
            console.update(seeded[1].id, &edit).await,
            Err(ConsoleError::Remote(_))
        ));

        assert!(console.refresh().await.is_err());
        assert_eq!(console.records(), before.as_slice());
    }

    /// Passes the uniqueness check but refuses to store anything.
    struct RejectingCreate(Arc<InMemoryDirectory>);

    #[async_trait::async_trait]
    impl UserDirectory for RejectingCreate {
        async fn authenticate(
            &self,
            identifier: &str,
            secret: &str,
        ) -> Result<Option<AuthenticatedPrincipal>, DirectoryError> {
            self.0.authenticate(identifier, secret).await
        }

        async fn list(&self) -> Result<Vec<UserRecord>, DirectoryError> {
            self.0.list().await
        }

        async fn create(&self, _record: NewUserRecord) -> Result<UserRecord, DirectoryError> {
            Err(DirectoryError::Backend {
                status: 503,
                message: "insert rejected".to_string(),
            })
        }

        async fn update(&self, id: RecordId, patch: UserPatch) -> Result<UserRecord, DirectoryError> {
            self.0.update(id, patch).await
        }

        async fn delete(&self, id: RecordId) -> Result<(), DirectoryError> {
            self.0.delete(id).await
        }

        async fn exists_by_identifier(
            &self,
            _identifier: &Identifier,
            _exclude: Option<RecordId>,
        ) -> Result<bool, DirectoryError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn failed_create_leaves_list_untouched() {
        let dir = Arc::new(InMemoryDirectory::new());
        let admin = dir.seed(new_record("Ana Souza", "12345678901", true));

        let mut console = AdminConsole::open(&admin.principal(), RejectingCreate(Arc::clone(&dir))).unwrap();
        console.refresh().await.unwrap();
        let before = console.records().to_vec();

        let err = console
            .create(&draft("Davi Rocha", "98765432100", false))
            .await
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Remote(DirectoryError::Backend { status: 503, .. })));
        assert_eq!(console.records(), before.as_slice());
        assert_eq!(dir.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_reported_without_a_remote_call() {
        let (mut console, dir, _) = console_with(&[("Ana Souza", "12345678901", true)]).await;
        dir.set_offline(true);

        let id = RecordId::new();
        assert!(matches!(console.delete(id).await, Err(ConsoleError::NotFound(found)) if found == id));
    }
}
