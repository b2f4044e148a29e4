use std::sync::Arc;

use thiserror::Error;

use waypoint_core::{AuthenticatedPrincipal, Identifier, NewUserRecord, RecordId, UserPatch, UserRecord};

/// Remote directory operation error.
///
/// These are **infrastructure errors** (network, backend, decoding) as opposed
/// to domain errors (validation, invariants). Callers surface them as a generic
/// retryable failure and never partially apply local state.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("network error: {0}")]
    Network(String),

    #[error("directory error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// The backend rejected a write because the identifier is taken.
    #[error("identifier already registered: {0}")]
    DuplicateIdentifier(Identifier),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Record store and authentication procedure exposed by the backend.
///
/// ## Contract
///
/// - `authenticate` answers `Ok(None)` for unknown identifiers *and* wrong
///   secrets; the two cases are indistinguishable to callers.
/// - `list` returns records in server order; callers must not rely on it.
/// - `create`/`update` return the stored record as the server sees it
///   (ids and timestamps are server-assigned).
/// - `exists_by_identifier` ignores the record named by `exclude`, so an
///   edited record does not collide with itself.
///
/// Uniqueness checks and writes are separate calls and are not atomic.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Option<AuthenticatedPrincipal>, DirectoryError>;

    async fn list(&self) -> Result<Vec<UserRecord>, DirectoryError>;

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, DirectoryError>;

    async fn update(&self, id: RecordId, patch: UserPatch) -> Result<UserRecord, DirectoryError>;

    async fn delete(&self, id: RecordId) -> Result<(), DirectoryError>;

    async fn exists_by_identifier(
        &self,
        identifier: &Identifier,
        exclude: Option<RecordId>,
    ) -> Result<bool, DirectoryError>;
}

#[async_trait::async_trait]
impl<D> UserDirectory for Arc<D>
where
    D: UserDirectory + ?Sized,
{
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Option<AuthenticatedPrincipal>, DirectoryError> {
        (**self).authenticate(identifier, secret).await
    }

    async fn list(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        (**self).list().await
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, DirectoryError> {
        (**self).create(record).await
    }

    async fn update(&self, id: RecordId, patch: UserPatch) -> Result<UserRecord, DirectoryError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: RecordId) -> Result<(), DirectoryError> {
        (**self).delete(id).await
    }

    async fn exists_by_identifier(
        &self,
        identifier: &Identifier,
        exclude: Option<RecordId>,
    ) -> Result<bool, DirectoryError> {
        (**self).exists_by_identifier(identifier, exclude).await
    }
}
