use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::identifier::Identifier;

/// Job role of a user record.
///
/// The role is descriptive only (no permissions hang off it); admin access is
/// the separate `is_admin` flag. It does drive the auto-derived secret policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Helper,
    Operator,
    Supervisor,
    Manager,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Helper,
        Role::Operator,
        Role::Supervisor,
        Role::Manager,
        Role::Administrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Helper => "helper",
            Role::Operator => "operator",
            Role::Supervisor => "supervisor",
            Role::Manager => "manager",
            Role::Administrator => "administrator",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Helper => "Helper",
            Role::Operator => "Operator",
            Role::Supervisor => "Supervisor",
            Role::Manager => "Manager",
            Role::Administrator => "Administrator",
        }
    }

    /// Derive the default secret for a new record with this role.
    ///
    /// helper → last 4 digits, operator → first 4 digits, anyone else → all 11.
    pub fn derive_secret(&self, identifier: &Identifier) -> String {
        match self {
            Role::Helper => identifier.trailing(4).to_string(),
            Role::Operator => identifier.leading(4).to_string(),
            _ => identifier.digits().to_string(),
        }
    }

    /// Describes what [`Role::derive_secret`] produces, for display next to the secret.
    pub fn secret_policy(&self) -> &'static str {
        match self {
            Role::Helper => "last 4 digits of the identifier",
            Role::Operator => "first 4 digits of the identifier",
            _ => "full identifier",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for Role {
    type Err = DomainError;

    /// Accepts the wire name or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == needle)
            .ok_or_else(|| DomainError::UnknownRole(s.trim().to_string()))
    }
}
