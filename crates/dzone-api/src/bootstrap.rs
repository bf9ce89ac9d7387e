//! # Zone Bootstrap
//!
//! Loads the zone catalog at startup and builds the application state.
//!
//! If `ZONE_CONFIG` is unset, the built-in catalog is used. A configured
//! path that cannot be read or parsed aborts startup rather than serving
//! with the wrong zones. Catalog issues (degenerate polygons, duplicate
//! priorities) are logged as warnings and do not abort.

use dzone_zones::{load_catalog, ZoneConfigError, ZoneRegistry};

use crate::state::{AppConfig, AppState};

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The configured zone catalog could not be loaded.
    #[error("zone catalog: {0}")]
    Catalog(#[from] ZoneConfigError),
}

/// Load the registry named by `config` and wrap it in an [`AppState`].
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let registry = match &config.zone_config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading zone catalog");
            ZoneRegistry::from_catalog(load_catalog(path)?)
        }
        None => {
            tracing::info!("ZONE_CONFIG not set, using built-in zone catalog");
            ZoneRegistry::builtin()
        }
    };

    if registry.is_empty() {
        tracing::warn!("zone catalog has no zones; every address will be rejected");
    }
    for zone in registry.zones() {
        tracing::info!(
            zone = %zone.id,
            name = zone.display_name(),
            priority = zone.priority,
            fee = %zone.fee_minor_units.format_major(registry.minor_unit_digits()),
            currency = registry.currency(),
            vertices = zone.polygon.len(),
            "zone active"
        );
    }

    Ok(AppState::with_registry(config, registry))
}
