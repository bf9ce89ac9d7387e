//! # Session Subcommand
//!
//! Replays a scripted sequence of address events against a fresh
//! `AddressState` and prints each step plus the final snapshot and quote.
//! Support staff use it to reproduce what a customer's checkout saw,
//! including async answers that arrived out of order.
//!
//! ## Script Format
//!
//! ```yaml
//! events:
//!   - type: text
//!     text: Ilica 242
//!   - type: begin
//!     ticket: lookup
//!     source: autocomplete
//!   - type: pin
//!     lat: 45.8131
//!     lng: 15.9775
//!   - type: complete
//!     ticket: lookup
//!     point: { lat: 45.95, lng: 15.97 }
//!     formatted_address: Somewhere else
//!   - type: fail
//!     ticket: lookup
//!     failure: { channel: geolocation, error: timeout }
//!   - type: clear
//! ```
//!
//! Tickets are named by the script so that later events can refer to them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use dzone_core::{AddressSource, GeoPoint};
use dzone_state::{
    AddressPhase, AddressSnapshot, AddressState, CheckoutQuote, Completion, Generation,
    ResolutionFailure, ResolutionTicket, ResolvedAddress,
};
use dzone_zones::ZoneRegistry;

/// Arguments for the `dzone session` subcommand.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// YAML or JSON event script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

/// A scripted session.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    pub events: Vec<ScriptEvent>,
}

/// One scripted address event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Typed address text.
    Text { text: String },
    /// Map click or marker drag.
    Pin { lat: f64, lng: f64 },
    /// Start an async resolution and name its ticket.
    Begin {
        ticket: String,
        source: AddressSource,
    },
    /// Successful answer for a named ticket.
    Complete {
        ticket: String,
        point: GeoPoint,
        #[serde(default)]
        formatted_address: Option<String>,
    },
    /// Failed answer for a named ticket.
    Fail {
        ticket: String,
        failure: ResolutionFailure,
    },
    /// Reset the address.
    Clear,
}

impl ScriptEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Pin { .. } => "pin",
            Self::Begin { .. } => "begin",
            Self::Complete { .. } => "complete",
            Self::Fail { .. } => "fail",
            Self::Clear => "clear",
        }
    }
}

/// What one replayed event did.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub event: &'static str,
    pub outcome: String,
    pub phase: AddressPhase,
    pub generation: Generation,
}

/// Full replay result.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub steps: Vec<StepReport>,
    pub snapshot: AddressSnapshot,
    pub quote: CheckoutQuote,
}

/// Execute the session subcommand.
pub fn run_session(args: &SessionArgs, registry: &ZoneRegistry) -> Result<u8> {
    let script = load_script(&args.script)?;
    let report = replay(&script, registry)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

/// Read a script file. `.json` parses as JSON, anything else as YAML.
pub fn load_script(path: &Path) -> Result<SessionScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session script {}", path.display()))?;
    let script = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))?
    };
    Ok(script)
}

/// Replay `script` against a fresh state.
pub fn replay(script: &SessionScript, registry: &ZoneRegistry) -> Result<SessionReport> {
    let mut state = AddressState::new();
    let mut tickets: HashMap<&str, ResolutionTicket> = HashMap::new();
    let mut steps = Vec::with_capacity(script.events.len());

    for (i, event) in script.events.iter().enumerate() {
        let step = i + 1;
        let outcome = match event {
            ScriptEvent::Text { text } => {
                state.set_address_text(text.clone());
                format!("text set to {text:?}")
            }
            ScriptEvent::Pin { lat, lng } => {
                let point = GeoPoint::new(*lat, *lng);
                let c = state.apply_resolved_point(point, AddressSource::ManualPin, registry);
                describe(c)
            }
            ScriptEvent::Begin { ticket, source } => {
                if tickets.contains_key(ticket.as_str()) {
                    bail!("step {step}: ticket {ticket:?} already issued");
                }
                let t = state.begin_async_resolution(*source);
                tickets.insert(ticket.as_str(), t);
                format!("ticket {ticket:?} issued at generation {}", t.generation)
            }
            ScriptEvent::Complete {
                ticket,
                point,
                formatted_address,
            } => {
                let t = lookup(&tickets, ticket, step)?;
                let resolved = ResolvedAddress {
                    point: *point,
                    formatted_address: formatted_address.clone(),
                };
                match state.complete_async_resolution(t, Ok(resolved), registry) {
                    Ok(Completion::Applied { classification }) => describe(&classification),
                    Ok(Completion::Stale) => format!("ticket {ticket:?} stale, discarded"),
                    Err(failure) => format!("unexpected failure: {failure}"),
                }
            }
            ScriptEvent::Fail { ticket, failure } => {
                let t = lookup(&tickets, ticket, step)?;
                match state.complete_async_resolution(t, Err(failure.clone()), registry) {
                    Ok(Completion::Stale) => format!("ticket {ticket:?} stale, failure discarded"),
                    Ok(Completion::Applied { .. }) => "unexpected success".to_string(),
                    Err(failure) => format!("failed: {failure}"),
                }
            }
            ScriptEvent::Clear => {
                state.clear();
                "cleared".to_string()
            }
        };

        tracing::info!(step, event = event.name(), %outcome, phase = %state.phase(), "replayed");
        steps.push(StepReport {
            step,
            event: event.name(),
            outcome,
            phase: state.phase(),
            generation: state.generation(),
        });
    }

    Ok(SessionReport {
        steps,
        snapshot: state.snapshot(),
        quote: state.checkout_quote(),
    })
}

fn lookup(
    tickets: &HashMap<&str, ResolutionTicket>,
    name: &str,
    step: usize,
) -> Result<ResolutionTicket> {
    match tickets.get(name) {
        Some(t) => Ok(*t),
        None => bail!("step {step}: unknown ticket {name:?}"),
    }
}

fn describe(c: &dzone_zones::Classification) -> String {
    match c.zone_id() {
        Some(zone) => format!("in zone {zone}"),
        None => "outside all zones".to_string(),
    }
}
