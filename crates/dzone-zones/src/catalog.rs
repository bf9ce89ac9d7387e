//! # Zone Catalog Configuration
//!
//! The on-disk form of a [`ZoneRegistry`](crate::ZoneRegistry). Catalogs are
//! YAML or JSON, chosen by file extension:
//!
//! ```yaml
//! currency: EUR
//! minor_unit_digits: 2
//! zones:
//!   - id: city
//!     name: City centre
//!     fee_minor_units: 300
//!     priority: 1
//!     polygon:
//!       - { lat: 45.795, lng: 15.940 }
//!       - { lat: 45.795, lng: 16.020 }
//!       - { lat: 45.830, lng: 16.020 }
//! ```
//!
//! Parsing checks structure and identifiers only. Geometry problems are
//! reported by [`ZoneRegistry::validate`](crate::ZoneRegistry::validate).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ZoneConfigError, ZoneConfigResult};
use crate::registry::{Zone, DEFAULT_CURRENCY, DEFAULT_MINOR_UNIT_DIGITS};

/// Catalog compiled into the crate, used when no file is configured.
const BUILTIN_CATALOG: &str = include_str!("../data/default_zones.yaml");

/// Parsed zone catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneCatalog {
    /// ISO 4217 currency code for all fees.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Fractional digits of the currency.
    #[serde(default = "default_minor_unit_digits")]
    pub minor_unit_digits: u8,
    /// Zones in declaration order.
    #[serde(default)]
    pub zones: Vec<Zone>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_minor_unit_digits() -> u8 {
    DEFAULT_MINOR_UNIT_DIGITS
}

impl ZoneCatalog {
    /// Parse a catalog from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// The built-in catalog.
    ///
    /// Falls back to an empty catalog if the embedded file fails to parse,
    /// which the crate's own tests rule out.
    pub fn builtin() -> Self {
        Self::from_yaml_str(BUILTIN_CATALOG).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in zone catalog is invalid; using an empty catalog");
            Self {
                currency: default_currency(),
                minor_unit_digits: default_minor_unit_digits(),
                zones: Vec::new(),
            }
        })
    }
}

/// Load a catalog file. `.yaml`/`.yml` parse as YAML, `.json` as JSON.
pub fn load_catalog(path: &Path) -> ZoneConfigResult<ZoneCatalog> {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Format::Yaml,
        Some("json") => Format::Json,
        _ => {
            return Err(ZoneConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ZoneConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ZoneConfigError::Io(e)
        }
    })?;

    tracing::debug!(path = %path.display(), "loading zone catalog");

    match format {
        Format::Yaml => ZoneCatalog::from_yaml_str(&content).map_err(|e| ZoneConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        }),
        Format::Json => ZoneCatalog::from_json_str(&content).map_err(|e| ZoneConfigError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

enum Format {
    Yaml,
    Json,
}
