//! Record form validation.
//!
//! Rules run per field in a fixed order and the first failing rule wins.
//! The identifier uniqueness check runs last and talks to the directory.

use std::collections::BTreeMap;

use waypoint_core::{
    DestinationUrl, Identifier, NewUserRecord, Role, UserRecord, strip_non_digits,
};
use waypoint_infra::UserDirectory;

const MIN_NAME_CHARS: usize = 2;
const MIN_SECRET_CHARS: usize = 3;

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    DisplayName,
    Identifier,
    Role,
    Secret,
    DestinationUrl,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DisplayName => "display_name",
            Field::Identifier => "identifier",
            Field::Role => "role",
            Field::Secret => "secret",
            Field::DestinationUrl => "destination_url",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub display_name: String,
    pub identifier: String,
    /// Role wire name or label; empty when nothing is selected.
    pub role: String,
    pub secret: String,
    pub destination_url: String,
    pub is_admin: bool,
}

impl RecordDraft {
    /// Pre-fill a draft for editing an existing record.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            display_name: record.display_name.clone(),
            identifier: record.identifier.formatted(),
            role: record.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
            secret: record.secret.clone(),
            destination_url: record.destination_url.to_string(),
            is_admin: record.is_admin,
        }
    }
}

#[derive(Default)]
struct Checked {
    display_name: Option<String>,
    identifier: Option<Identifier>,
    role: Option<Role>,
    secret: Option<String>,
    destination_url: Option<DestinationUrl>,
}

fn check_fields(draft: &RecordDraft) -> (Checked, ValidationErrors) {
    let mut checked = Checked::default();
    let mut errors = ValidationErrors::new();

    let name = draft.display_name.trim();
    if name.is_empty() {
        errors.add(Field::DisplayName, "name is required");
    } else if name.chars().count() < MIN_NAME_CHARS {
        errors.add(Field::DisplayName, "name must have at least 2 characters");
    } else {
        checked.display_name = Some(name.to_string());
    }

    if draft.identifier.trim().is_empty() {
        errors.add(Field::Identifier, "identifier is required");
    } else if strip_non_digits(&draft.identifier).len() != 11 {
        errors.add(Field::Identifier, "identifier must have 11 digits");
    } else {
        checked.identifier = Identifier::parse(&draft.identifier).ok();
    }

    if draft.role.trim().is_empty() {
        errors.add(Field::Role, "role is required");
    } else {
        match draft.role.parse::<Role>() {
            Ok(role) => checked.role = Some(role),
            Err(_) => errors.add(Field::Role, "unknown role"),
        }
    }

    if draft.secret.trim().is_empty() {
        errors.add(Field::Secret, "secret is required");
    } else if draft.secret.chars().count() < MIN_SECRET_CHARS {
        errors.add(Field::Secret, "secret must have at least 3 characters");
    } else {
        checked.secret = Some(draft.secret.clone());
    }

    if draft.destination_url.trim().is_empty() {
        errors.add(Field::DestinationUrl, "destination URL is required");
    } else {
        match DestinationUrl::parse(&draft.destination_url) {
            Ok(url) => checked.destination_url = Some(url),
            Err(_) => errors.add(
                Field::DestinationUrl,
                "destination URL must be a valid absolute URL",
            ),
        }
    }

    (checked, errors)
}

fn finish(
    checked: Checked,
    is_admin: bool,
    errors: ValidationErrors,
) -> Result<NewUserRecord, ValidationErrors> {
    if !errors.is_empty() {
        return Err(errors);
    }
    match checked {
        Checked {
            display_name: Some(display_name),
            identifier: Some(identifier),
            role: Some(role),
            secret: Some(secret),
            destination_url: Some(destination_url),
        } => Ok(NewUserRecord {
            display_name,
            identifier,
            secret,
            role,
            destination_url,
            is_admin,
        }),
        _ => Err(errors),
    }
}

/// Field rules only (no directory round-trip).
pub fn validate_fields(draft: &RecordDraft) -> Result<NewUserRecord, ValidationErrors> {
    let (checked, errors) = check_fields(draft);
    finish(checked, draft.is_admin, errors)
}

/// Full validation, including the uniqueness check.
///
/// `editing` is the record being edited, if any: its own identifier is not a
/// collision, and an unchanged identifier is not re-checked. The uniqueness
/// query runs whenever the identifier itself is well-formed, so its error is
/// reported alongside any other field errors.
pub async fn validate<D>(
    directory: &D,
    draft: &RecordDraft,
    editing: Option<&UserRecord>,
) -> Result<NewUserRecord, ValidationErrors>
where
    D: UserDirectory + ?Sized,
{
    let (checked, mut errors) = check_fields(draft);

    if let Some(identifier) = &checked.identifier {
        let changed = editing.is_none_or(|r| &r.identifier != identifier);
        if changed {
            match directory
                .exists_by_identifier(identifier, editing.map(|r| r.id))
                .await
            {
                Ok(true) => errors.add(Field::Identifier, "this identifier is already registered"),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(identifier = %identifier, "uniqueness check failed: {err}");
                    errors.add(Field::Identifier, "could not verify identifier");
                }
            }
        }
    }

    finish(checked, draft.is_admin, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_infra::InMemoryDirectory;

    fn valid_draft() -> RecordDraft {
        RecordDraft {
            display_name: "  Ana Souza ".to_string(),
            identifier: "123.456.789-01".to_string(),
            role: "helper".to_string(),
            secret: "8901".to_string(),
            destination_url: "https://example.com/ana".to_string(),
            is_admin: false,
        }
    }

    #[test]
    fn valid_draft_produces_trimmed_record() {
        let record = validate_fields(&valid_draft()).unwrap();
        assert_eq!(record.display_name, "Ana Souza");
        assert_eq!(record.identifier.formatted(), "123.456.789-01");
        assert_eq!(record.role, Role::Helper);
    }

    #[test]
    fn missing_destination_is_the_only_error() {
        let draft = RecordDraft {
            destination_url: String::new(),
            ..valid_draft()
        };
        let errors = validate_fields(&draft).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::DestinationUrl]);
        assert_eq!(errors.get(Field::DestinationUrl), Some("destination URL is required"));
    }

    #[test]
    fn first_failing_rule_wins_per_field() {
        let draft = RecordDraft {
            display_name: " a ".to_string(),
            identifier: "123".to_string(),
            role: "janitor".to_string(),
            secret: "ab".to_string(),
            destination_url: "not a url".to_string(),
            is_admin: false,
        };
        let errors = validate_fields(&draft).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(Field::DisplayName), Some("name must have at least 2 characters"));
        assert_eq!(errors.get(Field::Identifier), Some("identifier must have 11 digits"));
        assert_eq!(errors.get(Field::Role), Some("unknown role"));
        assert_eq!(errors.get(Field::Secret), Some("secret must have at least 3 characters"));
        assert_eq!(
            errors.get(Field::DestinationUrl),
            Some("destination URL must be a valid absolute URL")
        );
    }

    #[test]
    fn blank_fields_are_required_errors() {
        let errors = validate_fields(&RecordDraft::default()).unwrap_err();
        assert_eq!(errors.get(Field::DisplayName), Some("name is required"));
        assert_eq!(errors.get(Field::Identifier), Some("identifier is required"));
        assert_eq!(errors.get(Field::Role), Some("role is required"));
        assert_eq!(errors.get(Field::Secret), Some("secret is required"));
    }

    #[test]
    fn add_keeps_the_first_message() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::Secret, "first");
        errors.add(Field::Secret, "second");
        assert_eq!(errors.get(Field::Secret), Some("first"));
        assert_eq!(errors.to_string(), "secret: first");
    }

    #[tokio::test]
    async fn duplicate_identifier_is_an_identifier_error() {
        let dir = InMemoryDirectory::new();
        dir.seed(validate_fields(&valid_draft()).unwrap());

        let errors = validate(&dir, &valid_draft(), None).await.unwrap_err();
        assert_eq!(
            errors.get(Field::Identifier),
            Some("this identifier is already registered")
        );
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn editing_a_record_does_not_collide_with_itself() {
        let dir = InMemoryDirectory::new();
        let stored = dir.seed(validate_fields(&valid_draft()).unwrap());

        let draft = RecordDraft {
            display_name: "Ana S.".to_string(),
            ..RecordDraft::from_record(&stored)
        };
        let record = validate(&dir, &draft, Some(&stored)).await.unwrap();
        assert_eq!(record.display_name, "Ana S.");
    }

    #[tokio::test]
    async fn unchanged_identifier_is_not_rechecked() {
        let dir = InMemoryDirectory::new();
        let stored = dir.seed(validate_fields(&valid_draft()).unwrap());
        dir.set_offline(true);

        let draft = RecordDraft::from_record(&stored);
        assert!(validate(&dir, &draft, Some(&stored)).await.is_ok());
    }

    #[tokio::test]
    async fn failed_check_is_surfaced_on_identifier() {
        let dir = InMemoryDirectory::new();
        dir.set_offline(true);

        let errors = validate(&dir, &valid_draft(), None).await.unwrap_err();
        assert_eq!(errors.get(Field::Identifier), Some("could not verify identifier"));
    }

    #[tokio::test]
    async fn uniqueness_is_skipped_when_identifier_is_malformed() {
        let dir = InMemoryDirectory::new();
        dir.set_offline(true);

        let draft = RecordDraft {
            identifier: "12".to_string(),
            ..valid_draft()
        };
        let errors = validate(&dir, &draft, None).await.unwrap_err();
        assert_eq!(errors.get(Field::Identifier), Some("identifier must have 11 digits"));
    }
}
