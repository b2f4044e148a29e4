//! Listing rows as the console shows them.

use waypoint_core::{RecordId, UserRecord};

const CREATED_DATE_FORMAT: &str = "%d/%m/%Y";

/// A display row: secret masked, dates and identifier formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub id: RecordId,
    pub display_name: String,
    pub identifier: String,
    /// Empty for records that predate roles.
    pub role: String,
    pub masked_secret: String,
    pub destination_url: String,
    /// Whether the destination can be opened in a browser.
    pub destination_is_web: bool,
    pub kind: &'static str,
    pub created_on: String,
}

impl From<&UserRecord> for RecordView {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name.clone(),
            identifier: record.identifier.formatted(),
            role: record.role.map(|r| r.label().to_string()).unwrap_or_default(),
            masked_secret: record.masked_secret(),
            destination_url: record.destination_url.to_string(),
            destination_is_web: record.destination_url.is_web(),
            kind: if record.is_admin { "Admin" } else { "User" },
            created_on: record.created_at.format(CREATED_DATE_FORMAT).to_string(),
        }
    }
}
