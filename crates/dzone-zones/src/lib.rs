//! # dzone-zones — Delivery-Zone Registry and Resolution
//!
//! Decides which delivery zone a coordinate falls in.
//!
//! ## Components
//!
//! - **Classifier** (`classifier.rs`): even-odd ray-casting point-in-polygon
//!   test. Pure and total.
//!
//! - **Registry** (`registry.rs`): immutable zone catalog sorted by priority,
//!   plus configuration diagnostics.
//!
//! - **Resolver** (`resolver.rs`): first zone in priority order that
//!   contains the point, or outside.
//!
//! - **Catalog** (`catalog.rs`): YAML/JSON zone catalog files and the
//!   built-in default catalog.
//!
//! ## Data Flow
//!
//! ```text
//! catalog file ──load_catalog()──▶ ZoneCatalog ──from_catalog()──▶ ZoneRegistry
//!                                                                       │
//!                            GeoPoint ──classify()──────────────────────┘──▶ Classification
//! ```

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod registry;
pub mod resolver;

pub use catalog::{load_catalog, ZoneCatalog};
pub use classifier::is_inside;
pub use error::{ZoneConfigError, ZoneConfigResult};
pub use registry::{RegistryIssue, Zone, ZoneRegistry, DEFAULT_CURRENCY, DEFAULT_MINOR_UNIT_DIGITS};
pub use resolver::{classify, matching_zone, Classification};
