//! # dzone-core — Foundational Types for Delivery-Zone Resolution
//!
//! This crate is the leaf of the workspace. It defines the value types that
//! every other crate exchanges: coordinates, polygons, zone identifiers,
//! fees, and the source of an address fix. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Planar coordinates.** `GeoPoint` is a plain `(lat, lng)` pair. All
//!    geometry treats latitude and longitude as Cartesian axes. This is only
//!    valid for city-scale zones and no geodesic correction is attempted.
//!
//! 2. **Newtype wrappers for domain primitives.** `ZoneId` and
//!    `FeeMinorUnits` are newtypes. No bare strings for identifiers, no bare
//!    integers for money.
//!
//! 3. **Integer money.** Fees are whole minor units (cents). Floats never
//!    carry monetary amounts.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dzone-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fee;
pub mod geo;
pub mod identity;
pub mod source;

// Re-export primary types for ergonomic imports.
pub use error::ValidationError;
pub use fee::FeeMinorUnits;
pub use geo::{BoundingBox, GeoPoint, Polygon, MIN_POLYGON_VERTICES};
pub use identity::ZoneId;
pub use source::AddressSource;
