//! The 11-digit user identifier (login name).
//!
//! Identifiers are entered loosely (with or without punctuation) and always
//! displayed and stored as `NNN.NNN.NNN-NN`.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of digits in a complete identifier.
pub const IDENTIFIER_DIGITS: usize = 11;

/// Remove every character that is not an ASCII digit.
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Format (possibly partial) input the way an identifier field masks it while typing.
///
/// Only the first 11 digits are kept; punctuation is inserted as soon as the
/// following group has at least one digit: `1234` → `123.4`,
/// `1234567890` → `123.456.789-0`. The result depends only on the digits of
/// `input`, so formatting already-formatted text is a no-op.
pub fn format_identifier(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(IDENTIFIER_DIGITS)
        .collect();

    let mut out = String::with_capacity(IDENTIFIER_DIGITS + 3);
    for (idx, d) in digits.iter().enumerate() {
        match idx {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(*d);
    }
    out
}

/// A complete, validated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    digits: String,
}

impl ValueObject for Identifier {}

impl Identifier {
    /// Parse loose input: exactly 11 digits once non-digits are stripped.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let digits = strip_non_digits(input);
        if digits.len() != IDENTIFIER_DIGITS {
            return Err(DomainError::IdentifierLength {
                found: digits.len(),
            });
        }
        Ok(Self { digits })
    }

    /// The bare 11 digits.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The display form, `NNN.NNN.NNN-NN`.
    pub fn formatted(&self) -> String {
        format_identifier(&self.digits)
    }

    /// First `n` digits (all of them if `n` exceeds the length).
    pub fn leading(&self, n: usize) -> &str {
        &self.digits[..n.min(self.digits.len())]
    }

    /// Last `n` digits (all of them if `n` exceeds the length).
    pub fn trailing(&self, n: usize) -> &str {
        &self.digits[self.digits.len().saturating_sub(n)..]
    }
}

impl core::fmt::Display for Identifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Identifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.formatted())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Identifier::parse(&raw).map_err(serde::de::Error::custom)
    }
}
