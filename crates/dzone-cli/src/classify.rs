//! # Classify Subcommand
//!
//! Classifies a single coordinate against the loaded catalog.
//!
//! Exit code: 0 when the point is in a delivery zone, 1 when it is outside,
//! so shell scripts can branch on deliverability directly.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use dzone_core::GeoPoint;
use dzone_zones::{Classification, ZoneRegistry};

/// Arguments for the `dzone classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Latitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print machine-readable JSON instead of a summary line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    point: GeoPoint,
    classification: &'a Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_display: Option<String>,
    currency: &'a str,
}

/// Execute the classify subcommand.
pub fn run_classify(args: &ClassifyArgs, registry: &ZoneRegistry) -> Result<u8> {
    let point = GeoPoint::new(args.lat, args.lng);
    if let Err(e) = point.validate() {
        bail!("invalid coordinate: {e}");
    }

    let classification = registry.classify(&point);
    tracing::info!(%point, outcome = classification.kind(), "classified");
    println!("{}", render_classification(point, &classification, registry, args.json)?);

    Ok(if classification.is_zone() { 0 } else { 1 })
}

/// Format a classification for display.
pub fn render_classification(
    point: GeoPoint,
    classification: &Classification,
    registry: &ZoneRegistry,
    json: bool,
) -> Result<String> {
    let digits = registry.minor_unit_digits();
    if json {
        let output = ClassifyOutput {
            point,
            classification,
            fee_display: classification.fee().map(|f| f.format_major(digits)),
            currency: registry.currency(),
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(match classification {
        Classification::Zone {
            zone_id,
            fee_minor_units,
        } => {
            let name = registry
                .get(zone_id)
                .map(|z| z.display_name())
                .unwrap_or(zone_id.as_str());
            format!(
                "{point}: zone {zone_id} ({name}), fee {} {}",
                fee_minor_units.format_major(digits),
                registry.currency()
            )
        }
        Classification::Outside => format!("{point}: outside all delivery zones"),
    })
}
