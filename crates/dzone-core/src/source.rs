//! # Address Sources
//!
//! Where a resolved coordinate came from. The checkout form labels the
//! address with it, and the state machine uses it to tell synchronous
//! inputs (a map pin) from ones that arrive through an async collaborator.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Origin of a resolved address coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressSource {
    /// User picked a suggestion from address autocomplete.
    Autocomplete,
    /// User clicked the map or dragged the marker.
    ManualPin,
    /// Browser/device geolocation.
    DeviceLocation,
    /// Coordinate and text recovered by reverse geocoding.
    ReverseGeocode,
}

impl AddressSource {
    /// All sources in declaration order.
    pub fn all() -> &'static [AddressSource] {
        &[
            Self::Autocomplete,
            Self::ManualPin,
            Self::DeviceLocation,
            Self::ReverseGeocode,
        ]
    }

    /// The kebab-case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autocomplete => "autocomplete",
            Self::ManualPin => "manual-pin",
            Self::DeviceLocation => "device-location",
            Self::ReverseGeocode => "reverse-geocode",
        }
    }

    /// Whether the coordinate is normally delivered by an async collaborator
    /// (geocoding lookup or device geolocation) rather than directly by a
    /// UI event.
    pub fn is_async(&self) -> bool {
        !matches!(self, Self::ManualPin)
    }
}

impl std::fmt::Display for AddressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autocomplete" => Ok(Self::Autocomplete),
            "manual-pin" => Ok(Self::ManualPin),
            "device-location" => Ok(Self::DeviceLocation),
            "reverse-geocode" => Ok(Self::ReverseGeocode),
            other => Err(ValidationError::UnknownSource(other.to_string())),
        }
    }
}
