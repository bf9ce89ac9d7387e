//! # Error Types — Structured Error Hierarchy
//!
//! Defines the validation error shared across the workspace. Crate-specific
//! errors (configuration loading, resolution failures) live beside the code
//! that raises them. All errors use `thiserror`.
//!
//! ## Design
//!
//! - Validation errors name the offending field and the rejected value.
//! - Geometry never produces errors: point classification is total, and
//!   malformed polygons degrade to "never matched" instead of failing.

use thiserror::Error;

/// Rejected input value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A zone identifier was empty, too long, or contained invalid characters.
    #[error("invalid zone id {value:?}: {reason}")]
    InvalidZoneId {
        /// The rejected identifier.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A coordinate component was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteCoordinate {
        /// `"lat"` or `"lng"`.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A coordinate component was outside its valid range.
    #[error("{field} {value} is outside the range [{min}, {max}]")]
    CoordinateOutOfRange {
        /// `"lat"` or `"lng"`.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// An address source string was not recognized.
    #[error("unknown address source: {0:?}")]
    UnknownSource(String),
}
