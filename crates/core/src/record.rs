//! User records and the principal projection handed out by authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::destination::DestinationUrl;
use crate::id::RecordId;
use crate::identifier::Identifier;
use crate::role::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Stored record
// ─────────────────────────────────────────────────────────────────────────────

/// A user record as stored by the remote directory.
///
/// # Invariants
/// - `identifier` is unique across all records (checked before every write).
/// - At least one record has `is_admin = true`.
/// - `destination_url` is an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    pub display_name: String,
    pub identifier: Identifier,
    pub secret: String,
    /// Older rows may predate roles; every write sets one.
    #[serde(default)]
    pub role: Option<Role>,
    pub destination_url: DestinationUrl,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Build a stored record from a validated submission.
    pub fn from_new(id: RecordId, new: NewUserRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            display_name: new.display_name,
            identifier: new.identifier,
            secret: new.secret,
            role: Some(new.role),
            destination_url: new.destination_url,
            is_admin: new.is_admin,
            created_at,
            updated_at: Some(created_at),
        }
    }

    /// The secret-free projection returned on login.
    pub fn principal(&self) -> AuthenticatedPrincipal {
        AuthenticatedPrincipal {
            id: self.id,
            display_name: self.display_name.clone(),
            identifier: self.identifier.clone(),
            destination_url: self.destination_url.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }

    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: &UserPatch, updated_at: DateTime<Utc>) {
        if let Some(v) = &patch.display_name {
            self.display_name = v.clone();
        }
        if let Some(v) = &patch.identifier {
            self.identifier = v.clone();
        }
        if let Some(v) = &patch.secret {
            self.secret = v.clone();
        }
        if let Some(v) = patch.role {
            self.role = Some(v);
        }
        if let Some(v) = &patch.destination_url {
            self.destination_url = v.clone();
        }
        if let Some(v) = patch.is_admin {
            self.is_admin = v;
        }
        self.updated_at = Some(updated_at);
    }

    /// One bullet per character, for listings.
    pub fn masked_secret(&self) -> String {
        "•".repeat(self.secret.chars().count())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write shapes
// ─────────────────────────────────────────────────────────────────────────────

/// A validated record ready to be created (no id, no timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRecord {
    pub display_name: String,
    pub identifier: Identifier,
    pub secret: String,
    pub role: Role,
    pub destination_url: DestinationUrl,
    pub is_admin: bool,
}

/// Partial update; absent fields are left untouched by the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_url: Option<DestinationUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl From<NewUserRecord> for UserPatch {
    fn from(value: NewUserRecord) -> Self {
        Self {
            display_name: Some(value.display_name),
            identifier: Some(value.identifier),
            secret: Some(value.secret),
            role: Some(value.role),
            destination_url: Some(value.destination_url),
            is_admin: Some(value.is_admin),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Principal
// ─────────────────────────────────────────────────────────────────────────────

/// The authenticated user. Never carries the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    pub id: RecordId,
    pub display_name: String,
    pub identifier: Identifier,
    pub destination_url: DestinationUrl,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
