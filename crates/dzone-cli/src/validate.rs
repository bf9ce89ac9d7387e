//! # Validate Subcommand
//!
//! Checks a zone catalog for configuration problems before it is deployed.
//!
//! Exit code: 0 when the catalog is clean, 1 when issues were found, 2 when
//! the catalog could not be read or parsed.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use dzone_zones::{load_catalog, RegistryIssue, ZoneRegistry};

/// Arguments for the `dzone validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Catalog to validate. Defaults to `--zones`, then the built-in catalog.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Outcome of validating one catalog.
#[derive(Debug)]
pub enum ValidationReport {
    /// The catalog could not be loaded.
    Unreadable(String),
    /// The catalog loaded; `issues` may be empty.
    Loaded {
        zones: usize,
        issues: Vec<RegistryIssue>,
    },
}

impl ValidationReport {
    /// Process exit code for this report.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Unreadable(_) => 2,
            Self::Loaded { issues, .. } if issues.is_empty() => 0,
            Self::Loaded { .. } => 1,
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, default_path: Option<&Path>) -> Result<u8> {
    let path = args.path.as_deref().or(default_path);
    let label = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in catalog".to_string());

    let report = validate_catalog(path);
    match &report {
        ValidationReport::Unreadable(err) => {
            println!("FAIL: {label}: {err}");
        }
        ValidationReport::Loaded { zones, issues } => {
            println!("{label}: {zones} zone(s), {} issue(s)", issues.len());
            for issue in issues {
                println!("  ISSUE: {issue}");
            }
            if *zones == 0 {
                println!("  WARN: catalog has no zones; every address will be rejected");
            }
        }
    }
    Ok(report.exit_code())
}

/// Load and validate a catalog without printing.
pub fn validate_catalog(path: Option<&Path>) -> ValidationReport {
    let registry = match path {
        Some(path) => match load_catalog(path) {
            Ok(catalog) => ZoneRegistry::from_catalog(catalog),
            Err(e) => return ValidationReport::Unreadable(e.to_string()),
        },
        None => ZoneRegistry::builtin(),
    };
    ValidationReport::Loaded {
        zones: registry.len(),
        issues: registry.validate(),
    }
}
