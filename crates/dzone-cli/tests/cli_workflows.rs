//! # CLI Workflows
//!
//! Exercises the subcommand handlers against catalogs and scripts on disk.

use std::io::Write;

use dzone_cli::session::{load_script, replay};
use dzone_cli::validate::{validate_catalog, ValidationReport};
use dzone_cli::zones::render_zones;
use dzone_state::AddressPhase;

const JSON_CATALOG: &str = r#"{
  "currency": "JPY",
  "minor_unit_digits": 0,
  "zones": [
    {"id": "shibuya", "name": "Shibuya", "fee_minor_units": 500, "priority": 1,
     "polygon": [{"lat": 35.65, "lng": 139.69}, {"lat": 35.65, "lng": 139.71},
                 {"lat": 35.67, "lng": 139.71}, {"lat": 35.67, "lng": 139.69}]}
  ]
}"#;

fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn json_catalog_lists_and_validates() {
    let file = temp_file(".json", JSON_CATALOG);
    let registry = dzone_cli::load_registry(Some(file.path())).unwrap();

    let table = render_zones(&registry, false).unwrap();
    assert!(table.contains("FEE JPY"));
    assert!(table.contains("Shibuya"));
    assert!(table.contains("500"));

    match validate_catalog(Some(file.path())) {
        ValidationReport::Loaded { zones, issues } => {
            assert_eq!(zones, 1);
            assert!(issues.is_empty());
        }
        other => panic!("expected Loaded, got {other:?}"),
    }
}

#[test]
fn unsupported_extension_is_unreadable() {
    let file = temp_file(".toml", "zones = []");
    assert_eq!(validate_catalog(Some(file.path())).exit_code(), 2);
}

#[test]
fn replayed_script_matches_checkout_outcome() {
    let catalog = temp_file(".json", JSON_CATALOG);
    let script = temp_file(
        ".yaml",
        r#"
events:
  - type: text
    text: Dogenzaka 1
  - type: begin
    ticket: geo
    source: autocomplete
  - type: complete
    ticket: geo
    point: { lat: 35.658, lng: 139.700 }
    formatted_address: 1 Chome Dogenzaka, Shibuya
"#,
    );

    let registry = dzone_cli::load_registry(Some(catalog.path())).unwrap();
    let report = replay(&load_script(script.path()).unwrap(), &registry).unwrap();

    assert_eq!(report.steps[1].phase, AddressPhase::PendingResolution);
    assert_eq!(report.steps[2].phase, AddressPhase::Confirmed);
    assert_eq!(report.snapshot.raw_text, "1 Chome Dogenzaka, Shibuya");
    assert_eq!(report.quote.fee_minor_units.map(|f| f.minor_units()), Some(500));
    assert!(report.quote.can_submit);
}

#[test]
fn malformed_script_reports_path() {
    let script = temp_file(".yaml", "events: {not: a list}");
    let err = load_script(script.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse YAML"));
}
