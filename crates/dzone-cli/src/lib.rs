//! # dzone-cli — CLI Tool for Delivery Zones
//!
//! Provides the `dzone` command-line interface for operators and support
//! staff working with zone catalogs.
//!
//! ## Subcommands
//!
//! - `dzone classify` — Classify one coordinate.
//! - `dzone zones` — List zones in evaluation order.
//! - `dzone validate` — Check a catalog for configuration issues.
//! - `dzone session` — Replay a scripted checkout address session.
//!
//! ## Exit Codes
//!
//! 0 on success. `classify` exits 1 for a point outside every zone and
//! `validate` exits 1 when issues were found. Any command exits 2 when its
//! input could not be loaded.
//!
//! ```bash
//! dzone classify --lat 45.8131 --lng 15.9775
//! dzone --zones deploy/zones.yaml zones --json
//! dzone validate deploy/zones.yaml
//! dzone session support/ticket-4411.yaml
//! ```

pub mod classify;
pub mod session;
pub mod validate;
pub mod zones;

use std::path::Path;

use anyhow::{Context, Result};
use dzone_zones::{load_catalog, ZoneRegistry};

/// Load the registry from `path`, or the built-in catalog when `None`.
pub fn load_registry(path: Option<&Path>) -> Result<ZoneRegistry> {
    match path {
        Some(path) => {
            let catalog = load_catalog(path)
                .with_context(|| format!("failed to load zone catalog {}", path.display()))?;
            Ok(ZoneRegistry::from_catalog(catalog))
        }
        None => Ok(ZoneRegistry::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_when_no_path() {
        let registry = load_registry(None).unwrap();
        assert!(!registry.is_empty());
    }

    #[test]
    fn missing_catalog_has_context() {
        let err = load_registry(Some(Path::new("/nonexistent/zones.yaml"))).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to load zone catalog"), "got: {msg}");
        assert!(msg.contains("not found"), "got: {msg}");
    }
}
