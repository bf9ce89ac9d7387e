//! # Zone Registry
//!
//! The static, ordered catalog of delivery zones. Built once at startup,
//! never mutated, and shared by reference across all sessions.
//!
//! ## Ordering
//!
//! Zones are sorted ascending by `priority` at construction. The sort is
//! stable, so zones that share a priority keep their declaration order.
//! Lower priority values are evaluated first and should be the innermost
//! (smallest, cheapest) zones.
//!
//! ## Malformed Zones
//!
//! A zone whose polygon has fewer than three vertices is kept in the
//! registry but can never match. [`ZoneRegistry::validate`] reports it, along
//! with the other issues below, so operators can fix the catalog without the
//! resolver ever failing at runtime.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dzone_core::{FeeMinorUnits, GeoPoint, Polygon, ZoneId};

use crate::catalog::ZoneCatalog;
use crate::resolver::{self, Classification};

/// Currency code used when a catalog does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Fractional digits of the default currency.
pub const DEFAULT_MINOR_UNIT_DIGITS: u8 = 2;

/// A named delivery region with a flat fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier.
    pub id: ZoneId,
    /// Display label. Falls back to the id when empty.
    #[serde(default)]
    pub name: String,
    /// Flat delivery fee charged for addresses in this zone.
    pub fee_minor_units: FeeMinorUnits,
    /// Evaluation rank; lower is evaluated first.
    pub priority: i32,
    /// Zone boundary.
    pub polygon: Polygon,
}

impl Zone {
    /// Create a zone whose display name is its id.
    pub fn new(id: ZoneId, polygon: Polygon, fee_minor_units: FeeMinorUnits, priority: i32) -> Self {
        Self {
            id,
            name: String::new(),
            fee_minor_units,
            priority,
            polygon,
        }
    }

    /// Set the display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Display label, or the id when no label is configured.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// A configuration problem found by [`ZoneRegistry::validate`].
///
/// None of these cause classification to fail. Degenerate and non-finite
/// polygons simply never match; duplicates are resolved by priority order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryIssue {
    /// Polygon has too few vertices to enclose an area.
    #[error("zone {zone}: polygon has {vertices} vertices, at least 3 required; zone will never match")]
    DegeneratePolygon {
        /// Affected zone.
        zone: ZoneId,
        /// Number of vertices found.
        vertices: usize,
    },

    /// A polygon vertex has a NaN or infinite component.
    #[error("zone {zone}: vertex {index} is not finite")]
    NonFiniteVertex {
        /// Affected zone.
        zone: ZoneId,
        /// Index of the vertex in the ring.
        index: usize,
    },

    /// Two zones share an id; only the first in priority order can ever be reported.
    #[error("zone id {zone} is declared more than once")]
    DuplicateZoneId {
        /// The repeated id.
        zone: ZoneId,
    },

    /// Two zones share a priority; declaration order breaks the tie.
    #[error("zones {first} and {second} share priority {priority}; declaration order decides")]
    DuplicatePriority {
        /// The shared priority.
        priority: i32,
        /// Zone declared first.
        first: ZoneId,
        /// Zone declared later.
        second: ZoneId,
    },
}

/// Immutable, priority-ordered catalog of delivery zones.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    currency: String,
    minor_unit_digits: u8,
}

impl ZoneRegistry {
    /// Build a registry from zones in any order, using the default currency.
    pub fn new(zones: Vec<Zone>) -> Self {
        Self::with_currency(zones, DEFAULT_CURRENCY, DEFAULT_MINOR_UNIT_DIGITS)
    }

    /// Build a registry with an explicit currency.
    pub fn with_currency(mut zones: Vec<Zone>, currency: impl Into<String>, minor_unit_digits: u8) -> Self {
        zones.sort_by_key(|z| z.priority);
        Self {
            zones,
            currency: currency.into(),
            minor_unit_digits,
        }
    }

    /// A registry with no zones. Every point classifies as outside.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build a registry from a parsed catalog, logging any validation issues.
    pub fn from_catalog(catalog: ZoneCatalog) -> Self {
        let registry = Self::with_currency(catalog.zones, catalog.currency, catalog.minor_unit_digits);
        for issue in registry.validate() {
            tracing::warn!(%issue, "zone catalog issue");
        }
        tracing::info!(
            zones = registry.len(),
            currency = %registry.currency,
            "zone registry loaded"
        );
        registry
    }

    /// The catalog compiled into this crate.
    pub fn builtin() -> Self {
        Self::from_catalog(ZoneCatalog::builtin())
    }

    /// Zones in evaluation order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone by id. Returns the first in evaluation order.
    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| &z.id == id)
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the registry has no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// ISO 4217 currency code fees are denominated in.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Fractional digits of the currency.
    pub fn minor_unit_digits(&self) -> u8 {
        self.minor_unit_digits
    }

    /// Classify a point against this registry.
    pub fn classify(&self, point: &GeoPoint) -> Classification {
        resolver::classify(point, self)
    }

    /// Report configuration problems.
    ///
    /// Issues are listed zone by zone in evaluation order.
    pub fn validate(&self) -> Vec<RegistryIssue> {
        let mut issues = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_priorities: HashMap<i32, &ZoneId> = HashMap::new();

        for zone in &self.zones {
            if zone.polygon.is_degenerate() {
                issues.push(RegistryIssue::DegeneratePolygon {
                    zone: zone.id.clone(),
                    vertices: zone.polygon.len(),
                });
            }
            for (index, vertex) in zone.polygon.vertices().iter().enumerate() {
                if !vertex.is_finite() {
                    issues.push(RegistryIssue::NonFiniteVertex {
                        zone: zone.id.clone(),
                        index,
                    });
                }
            }
            if !seen_ids.insert(&zone.id) {
                issues.push(RegistryIssue::DuplicateZoneId {
                    zone: zone.id.clone(),
                });
            }
            match seen_priorities.get(&zone.priority) {
                Some(first) => issues.push(RegistryIssue::DuplicatePriority {
                    priority: zone.priority,
                    first: (*first).clone(),
                    second: zone.id.clone(),
                }),
                None => {
                    seen_priorities.insert(zone.priority, &zone.id);
                }
            }
        }
        issues
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
