//! Redirect destination for non-admin users.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// An absolute URL a user is sent to after logging in.
///
/// Keeps the text as entered (trimmed); that text is what is displayed and
/// stored. The parsed form is only used for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestinationUrl {
    raw: String,
    url: Url,
}

impl ValueObject for DestinationUrl {}

impl DestinationUrl {
    /// Parse an absolute URL. Relative references are rejected.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let raw = input.trim();
        let url = Url::parse(raw).map_err(|e| DomainError::InvalidDestination(e.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// The URL as entered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether a link preview makes sense (http/https only).
    pub fn is_web(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

impl core::fmt::Display for DestinationUrl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DestinationUrl> for Url {
    fn from(value: DestinationUrl) -> Self {
        value.url
    }
}

impl Serialize for DestinationUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for DestinationUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DestinationUrl::parse(&raw).map_err(serde::de::Error::custom)
    }
}
