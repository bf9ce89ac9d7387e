//! # Zone Resolver
//!
//! Classifies a point into exactly one zone, or outside the service area.
//!
//! Zones are tried in ascending priority order and the first polygon that
//! contains the point wins. Overlap is expected: an inner city zone sits
//! entirely inside the extended zone, and priority picks the inner one.
//! There is no area weighting and no hidden state, so the same point and
//! registry always produce the same answer.
//!
//! "Outside" is a normal business result, not an error.

use serde::{Deserialize, Serialize};

use dzone_core::{FeeMinorUnits, GeoPoint, ZoneId};

use crate::classifier::is_inside;
use crate::registry::{Zone, ZoneRegistry};

/// Result of classifying a point.
///
/// Serializes as `{"kind":"zone","zone_id":"city","fee_minor_units":300}`
/// or `{"kind":"outside"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// The point falls in a delivery zone.
    Zone {
        /// Matched zone.
        zone_id: ZoneId,
        /// The zone's flat fee.
        fee_minor_units: FeeMinorUnits,
    },
    /// The point is outside every zone.
    Outside,
}

impl Classification {
    /// Whether the point is deliverable.
    pub fn is_zone(&self) -> bool {
        matches!(self, Self::Zone { .. })
    }

    /// Matched zone id, if any.
    pub fn zone_id(&self) -> Option<&ZoneId> {
        match self {
            Self::Zone { zone_id, .. } => Some(zone_id),
            Self::Outside => None,
        }
    }

    /// Delivery fee, if deliverable.
    pub fn fee(&self) -> Option<FeeMinorUnits> {
        match self {
            Self::Zone { fee_minor_units, .. } => Some(*fee_minor_units),
            Self::Outside => None,
        }
    }

    /// `"zone"` or `"outside"`, matching the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Zone { .. } => "zone",
            Self::Outside => "outside",
        }
    }
}

impl From<&Zone> for Classification {
    fn from(zone: &Zone) -> Self {
        Self::Zone {
            zone_id: zone.id.clone(),
            fee_minor_units: zone.fee_minor_units,
        }
    }
}

/// First zone in priority order whose polygon contains `point`.
pub fn matching_zone<'r>(point: &GeoPoint, registry: &'r ZoneRegistry) -> Option<&'r Zone> {
    registry
        .zones()
        .iter()
        .find(|zone| is_inside(point, &zone.polygon))
}

/// Classify `point` against `registry`. Total: never fails.
pub fn classify(point: &GeoPoint, registry: &ZoneRegistry) -> Classification {
    matching_zone(point, registry).map_or(Classification::Outside, Classification::from)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use dzone_core::Polygon;
    use proptest::prelude::*;

    fn nested() -> ZoneRegistry {
        ZoneRegistry::new(vec![
            Zone::new(
                ZoneId::new("inner").unwrap(),
                Polygon::from_pairs(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]),
                FeeMinorUnits(300),
                1,
            ),
            Zone::new(
                ZoneId::new("outer").unwrap(),
                Polygon::from_pairs(&[(0.0, 0.0), (0.0, 20.0), (20.0, 20.0), (20.0, 0.0)]),
                FeeMinorUnits(700),
                2,
            ),
        ])
    }

    proptest! {
        /// Points strictly inside the inner square resolve to the inner zone
        /// even though the outer square also contains them.
        #[test]
        fn inner_zone_takes_precedence(lat in 0.01f64..9.99, lng in 0.01f64..9.99) {
            let c = classify(&GeoPoint::new(lat, lng), &nested());
            prop_assert_eq!(c.zone_id().map(ZoneId::as_str), Some("inner"));
        }

        /// Points strictly inside the outer ring resolve to the outer zone.
        #[test]
        fn outer_ring_resolves_to_outer(lat in 10.01f64..19.99, lng in 0.01f64..19.99) {
            let c = classify(&GeoPoint::new(lat, lng), &nested());
            prop_assert_eq!(c.zone_id().map(ZoneId::as_str), Some("outer"));
        }

        /// Points beyond every zone's extent are outside.
        #[test]
        fn far_points_are_outside(lat in 20.01f64..90.0, lng in -180.0f64..180.0) {
            prop_assert_eq!(classify(&GeoPoint::new(lat, lng), &nested()), Classification::Outside);
        }

        /// Classification is deterministic for any input.
        #[test]
        fn classify_is_deterministic(lat in -90.0f64..90.0, lng in -180.0f64..180.0) {
            let registry = nested();
            let p = GeoPoint::new(lat, lng);
            prop_assert_eq!(classify(&p, &registry), classify(&p, &registry));
        }
    }
}
