//! # Resolution Failures
//!
//! Failures reported by the external collaborators that turn user input
//! into coordinates. The state machine never retries and never invents a
//! location on failure; it hands these back to the caller unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device geolocation failure, mirroring the browser Geolocation API codes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationError {
    /// The user or platform refused location access.
    #[error("location permission denied")]
    PermissionDenied,
    /// The device could not determine a position.
    #[error("position unavailable")]
    PositionUnavailable,
    /// No position arrived before the deadline.
    #[error("location request timed out")]
    Timeout,
}

/// Geocoding or reverse-geocoding failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeocodingError {
    /// The provider returned no match for the query.
    #[error("no results for address")]
    NoResults,
    /// The provider failed (network, quota, upstream error).
    #[error("geocoding provider error: {message}")]
    Provider {
        /// Provider-supplied description.
        message: String,
    },
}

/// A failed async resolution, surfaced to the caller as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "channel", content = "error", rename_all = "snake_case")]
pub enum ResolutionFailure {
    /// Device geolocation failed.
    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),
    /// Address lookup failed.
    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),
}
