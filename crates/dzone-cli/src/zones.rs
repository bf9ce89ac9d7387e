//! # Zones Subcommand
//!
//! Lists the catalog's zones in evaluation order.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dzone_core::{BoundingBox, FeeMinorUnits, ZoneId};
use dzone_zones::ZoneRegistry;

/// Arguments for the `dzone zones` subcommand.
#[derive(Args, Debug)]
pub struct ZonesArgs {
    /// Print machine-readable JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ZoneRow<'a> {
    id: &'a ZoneId,
    name: &'a str,
    priority: i32,
    fee_minor_units: FeeMinorUnits,
    vertices: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundingBox>,
}

/// Execute the zones subcommand.
pub fn run_zones(args: &ZonesArgs, registry: &ZoneRegistry) -> Result<u8> {
    println!("{}", render_zones(registry, args.json)?);
    Ok(0)
}

/// Format the zone list for display.
pub fn render_zones(registry: &ZoneRegistry, json: bool) -> Result<String> {
    let rows: Vec<ZoneRow<'_>> = registry
        .zones()
        .iter()
        .map(|z| ZoneRow {
            id: &z.id,
            name: z.display_name(),
            priority: z.priority,
            fee_minor_units: z.fee_minor_units,
            vertices: z.polygon.len(),
            bounds: z.polygon.bounding_box(),
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    if rows.is_empty() {
        return Ok("No zones configured.".to_string());
    }

    let digits = registry.minor_unit_digits();
    let mut out = format!(
        "{:<8} {:<20} {:<24} {:>10} {:>8}",
        "PRIORITY",
        "ID",
        "NAME",
        format!("FEE {}", registry.currency()),
        "VERTICES"
    );
    for row in &rows {
        out.push('\n');
        out.push_str(&format!(
            "{:<8} {:<20} {:<24} {:>10} {:>8}",
            row.priority,
            row.id.as_str(),
            row.name,
            row.fee_minor_units.format_major(digits),
            row.vertices
        ));
    }
    Ok(out)
}
