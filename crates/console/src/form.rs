//! Editable record form state.

use waypoint_core::{Identifier, Role, UserRecord, format_identifier};

use crate::validate::RecordDraft;

/// Form for creating a record or editing an existing one.
///
/// While creating, the secret follows the role and identifier: once both are
/// present it is re-derived on every change of either. Typing a secret only
/// clears the auto-generated marker. Editing never touches the stored secret.
#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    draft: RecordDraft,
    editing: Option<UserRecord>,
    secret_auto_generated: bool,
}

impl RecordForm {
    /// Empty form for a new record.
    pub fn create() -> Self {
        Self::default()
    }

    /// Form pre-filled from `record`.
    pub fn edit(record: &UserRecord) -> Self {
        Self {
            draft: RecordDraft::from_record(record),
            editing: Some(record.clone()),
            secret_auto_generated: false,
        }
    }

    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&UserRecord> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn set_display_name(&mut self, value: impl Into<String>) {
        self.draft.display_name = value.into();
    }

    /// Stores the input masked as `NNN.NNN.NNN-NN` (partial input stays partial).
    pub fn set_identifier(&mut self, value: &str) {
        self.draft.identifier = format_identifier(value);
        self.rederive_secret();
    }

    pub fn set_role(&mut self, role: Role) {
        self.draft.role = role.as_str().to_string();
        self.rederive_secret();
    }

    pub fn set_secret(&mut self, value: impl Into<String>) {
        self.draft.secret = value.into();
        self.secret_auto_generated = false;
    }

    pub fn set_destination_url(&mut self, value: impl Into<String>) {
        self.draft.destination_url = value.into();
    }

    pub fn set_admin(&mut self, is_admin: bool) {
        self.draft.is_admin = is_admin;
    }

    pub fn is_secret_auto_generated(&self) -> bool {
        self.secret_auto_generated
    }

    /// How the current secret was derived, while it still is.
    pub fn auto_secret_hint(&self) -> Option<&'static str> {
        if !self.secret_auto_generated {
            return None;
        }
        self.draft.role.parse::<Role>().ok().map(|r| r.secret_policy())
    }

    fn rederive_secret(&mut self) {
        if self.editing.is_some() {
            return;
        }
        let (Ok(role), Ok(identifier)) = (
            self.draft.role.parse::<Role>(),
            Identifier::parse(&self.draft.identifier),
        ) else {
            return;
        };
        self.draft.secret = role.derive_secret(&identifier);
        self.secret_auto_generated = true;
    }
}
