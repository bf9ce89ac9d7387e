//! # Zone Identifier
//!
//! `ZoneId` names a delivery zone in configuration, API responses, and the
//! checkout form. Identifiers are validated at construction so a zone id
//! is always safe to use as a metrics label or URL segment.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a zone identifier.
const MAX_ZONE_ID_LEN: usize = 64;

/// Identifier of a delivery zone (e.g. `"city"`, `"extended"`).
///
/// 1–64 characters drawn from `[a-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneId(String);

impl ZoneId {
    /// Create a validated zone identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::InvalidZoneId {
                value: id,
                reason: "must not be empty",
            });
        }
        if id.len() > MAX_ZONE_ID_LEN {
            return Err(ValidationError::InvalidZoneId {
                value: id,
                reason: "must be at most 64 characters",
            });
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidZoneId {
                value: id,
                reason: "must contain only lowercase ascii letters, digits, '_' or '-'",
            });
        }
        Ok(Self(id))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ZoneId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ZoneId> for String {
    fn from(id: ZoneId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ZoneId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
