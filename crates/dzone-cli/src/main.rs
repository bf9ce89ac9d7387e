//! # dzone CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dzone_zones::ZoneRegistry;

use dzone_cli::classify::{run_classify, ClassifyArgs};
use dzone_cli::session::{run_session, SessionArgs};
use dzone_cli::validate::{run_validate, ValidateArgs};
use dzone_cli::zones::{run_zones, ZonesArgs};

/// Delivery-zone resolution toolkit.
///
/// Classifies coordinates against a zone catalog, lists and validates
/// catalogs, and replays checkout address sessions.
#[derive(Parser, Debug)]
#[command(name = "dzone", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Zone catalog (.yaml, .yml or .json). Defaults to the built-in catalog.
    #[arg(long, global = true)]
    zones: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a coordinate into a delivery zone.
    Classify(ClassifyArgs),

    /// List zones in evaluation order.
    Zones(ZonesArgs),

    /// Check a zone catalog for configuration issues.
    Validate(ValidateArgs),

    /// Replay a scripted checkout address session.
    Session(SessionArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(zones = ?cli.zones, "dzone CLI starting");

    let zones = cli.zones.as_deref();
    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, zones),
        Commands::Classify(args) => with_registry(zones, |r| run_classify(&args, r)),
        Commands::Zones(args) => with_registry(zones, |r| run_zones(&args, r)),
        Commands::Session(args) => with_registry(zones, |r| run_session(&args, r)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Load the catalog, then run `f` against it.
fn with_registry(
    path: Option<&Path>,
    f: impl FnOnce(&ZoneRegistry) -> anyhow::Result<u8>,
) -> anyhow::Result<u8> {
    let registry = dzone_cli::load_registry(path)?;
    f(&registry)
}
