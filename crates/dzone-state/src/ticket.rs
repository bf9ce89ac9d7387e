//! # Generation Tokens
//!
//! Async collaborators (geocoding, device geolocation) can answer out of
//! order. Every input event advances the state's generation; an async
//! request captures the generation at issue time in a [`ResolutionTicket`]
//! and its answer is applied only if that generation is still current.
//!
//! ```text
//! begin(A) ─▶ g=1 ─────────────────────────── complete(A, g=1) ✗ stale
//!                 begin(B) ─▶ g=2 ── complete(B, g=2) ✓ applied
//! ```

use serde::{Deserialize, Serialize};

use dzone_core::{AddressSource, GeoPoint};

/// Monotonically increasing input counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// Last value of the counter. Tickets carrying it are never current.
    pub const EXHAUSTED: Self = Self(u64::MAX);

    /// The following generation, or [`EXHAUSTED`](Self::EXHAUSTED) once the
    /// counter runs out.
    pub fn next(self) -> Self {
        self.0.checked_add(1).map_or(Self::EXHAUSTED, Generation)
    }

    /// Whether the counter has reached its ceiling.
    pub fn is_exhausted(&self) -> bool {
        *self == Self::EXHAUSTED
    }

    /// Raw counter value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one in-flight async resolution.
///
/// Returned by `AddressState::begin_async_resolution` and handed back on
/// completion. Holding a ticket grants nothing once a newer input arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionTicket {
    /// Generation captured when the request was issued.
    pub generation: Generation,
    /// Collaborator the request went to.
    pub source: AddressSource,
}

impl ResolutionTicket {
    /// Rebuild a ticket, e.g. from a request path.
    pub fn new(generation: Generation, source: AddressSource) -> Self {
        Self { generation, source }
    }
}

/// Successful answer from an async collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Resolved coordinate.
    pub point: GeoPoint,
    /// Provider-formatted address text, replacing the typed text if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
}

impl ResolvedAddress {
    /// A bare coordinate (device geolocation).
    pub fn at(point: GeoPoint) -> Self {
        Self {
            point,
            formatted_address: None,
        }
    }

    /// A coordinate with provider-formatted text (geocoding).
    pub fn with_text(point: GeoPoint, formatted_address: impl Into<String>) -> Self {
        Self {
            point,
            formatted_address: Some(formatted_address.into()),
        }
    }
}
