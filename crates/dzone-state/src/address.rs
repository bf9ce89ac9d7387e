//! # Address Confirmation State Machine
//!
//! Holds what the user typed, where it resolved to, which zone that is,
//! and whether checkout may proceed. One instance per checkout session.
//!
//! ## Phases
//!
//! Phases are derived from the fields, not stored:
//!
//! ```text
//!                 apply_resolved_point()
//!   Empty ─────────────────────────────────────▶ Confirmed | Rejected
//!     │ ▲                                             │ ▲
//!     │ └──────────────── clear() ◀──────────────────┘ │
//!     │                                                 │
//!     └─ begin_async_resolution() ─▶ PendingResolution ─┘ complete (current ticket, success)
//!                                        │
//!                                        └─ complete (current ticket, failure) ─▶ previous phase
//! ```
//!
//! The machine is cyclic: every phase is re-entered on the next address edit.
//!
//! ## Invariants
//!
//! - `confirmed == classification.is_zone()`. `confirmed` is computed, never
//!   stored, so `confirmed` with an outside classification cannot exist.
//! - The point, its classification, and its source live in one
//!   `Option<ResolvedLocation>`: no point means no classification means not
//!   confirmed.
//! - `generation` only increases, including across `clear()`, so a ticket
//!   issued before any later input is stale forever.
//! - The in-flight ticket is kept as issued. A completion is matched to it by
//!   generation and always records the issued source, never the caller's.

use serde::{Deserialize, Serialize};

use dzone_core::{AddressSource, GeoPoint};
use dzone_zones::{Classification, ZoneRegistry};

use crate::error::ResolutionFailure;
use crate::quote::CheckoutQuote;
use crate::ticket::{Generation, ResolutionTicket, ResolvedAddress};

// ─── Phase ───────────────────────────────────────────────────────────

/// Derived phase of an [`AddressState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressPhase {
    /// No resolved location.
    Empty,
    /// An async resolution for the current generation is in flight.
    PendingResolution,
    /// Resolved inside a delivery zone.
    Confirmed,
    /// Resolved outside every delivery zone.
    Rejected,
}

impl std::fmt::Display for AddressPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Empty => "EMPTY",
            Self::PendingResolution => "PENDING_RESOLUTION",
            Self::Confirmed => "CONFIRMED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

// ─── Resolved location ───────────────────────────────────────────────

/// A resolved coordinate together with its classification and origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Resolved coordinate.
    pub point: GeoPoint,
    /// Zone the coordinate falls in, or outside.
    pub classification: Classification,
    /// Where the coordinate came from.
    pub source: AddressSource,
}

/// Outcome of handing an async answer back to the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    /// The answer was current and has been applied.
    Applied {
        /// Classification of the applied point.
        classification: Classification,
    },
    /// A newer input superseded the request; nothing changed.
    Stale,
}

// ─── Snapshot ────────────────────────────────────────────────────────

/// Serializable view of an [`AddressState`], including derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    /// Address text as last typed or formatted.
    pub raw_text: String,
    /// Resolved coordinate.
    pub point: Option<GeoPoint>,
    /// Classification of `point`.
    pub classification: Option<Classification>,
    /// Derived: classification is a zone.
    pub confirmed: bool,
    /// Origin of `point`.
    pub source: Option<AddressSource>,
    /// Current generation.
    pub generation: Generation,
    /// Derived phase.
    pub phase: AddressPhase,
}

// ─── State ───────────────────────────────────────────────────────────

/// Address confirmation state for one checkout session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressState {
    raw_text: String,
    location: Option<ResolvedLocation>,
    generation: Generation,
    pending: Option<ResolutionTicket>,
}

impl AddressState {
    /// A state in the `Empty` phase at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Address text as last typed or formatted by a provider.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Resolved location, if any.
    pub fn location(&self) -> Option<&ResolvedLocation> {
        self.location.as_ref()
    }

    /// Resolved coordinate, if any.
    pub fn point(&self) -> Option<GeoPoint> {
        self.location.as_ref().map(|l| l.point)
    }

    /// Classification of the resolved coordinate, if any.
    pub fn classification(&self) -> Option<&Classification> {
        self.location.as_ref().map(|l| &l.classification)
    }

    /// Origin of the resolved coordinate, if any.
    pub fn source(&self) -> Option<AddressSource> {
        self.location.as_ref().map(|l| l.source)
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether an async resolution for the current generation is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The ticket of the in-flight resolution, as issued.
    pub fn pending_ticket(&self) -> Option<ResolutionTicket> {
        self.pending
    }

    /// Whether the resolved coordinate is inside a delivery zone.
    pub fn is_confirmed(&self) -> bool {
        self.classification().is_some_and(Classification::is_zone)
    }

    /// Derived phase.
    pub fn phase(&self) -> AddressPhase {
        if self.pending.is_some() {
            return AddressPhase::PendingResolution;
        }
        match self.classification() {
            None => AddressPhase::Empty,
            Some(c) if c.is_zone() => AddressPhase::Confirmed,
            Some(_) => AddressPhase::Rejected,
        }
    }

    /// Whether `ticket` belongs to the in-flight resolution.
    ///
    /// Only the generation is compared; the source recorded on completion
    /// comes from the issued ticket.
    pub fn is_current(&self, ticket: &ResolutionTicket) -> bool {
        self.pending
            .is_some_and(|issued| issued.generation == ticket.generation)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Record typed text.
    ///
    /// Typing proves nothing about location, so the resolved point,
    /// classification, and confirmation are left untouched.
    pub fn set_address_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
    }

    /// Apply a coordinate that is already known (map click, marker drag,
    /// or a completed lookup) and classify it synchronously.
    ///
    /// Advances the generation, so any in-flight async request becomes stale.
    pub fn apply_resolved_point(
        &mut self,
        point: GeoPoint,
        source: AddressSource,
        registry: &ZoneRegistry,
    ) -> &Classification {
        self.generation = self.generation.next();
        self.pending = None;
        let classification = registry.classify(&point);
        tracing::debug!(
            generation = %self.generation,
            %point,
            %source,
            outcome = classification.kind(),
            zone = ?classification.zone_id().map(|z| z.as_str()),
            "address point resolved"
        );
        let location = self.location.insert(ResolvedLocation {
            point,
            classification,
            source,
        });
        &location.classification
    }

    /// Start an async resolution and return its ticket.
    ///
    /// Advances the generation. The previous location, if any, is kept until
    /// the answer arrives, but checkout is blocked while the request is in
    /// flight (see [`CheckoutQuote::can_submit`]).
    ///
    /// Once the generation counter is exhausted the returned ticket is never
    /// current and nothing is marked pending.
    pub fn begin_async_resolution(&mut self, source: AddressSource) -> ResolutionTicket {
        self.generation = self.generation.next();
        let ticket = ResolutionTicket::new(self.generation, source);
        if self.generation.is_exhausted() {
            tracing::warn!(%source, "generation counter exhausted; async result will be discarded");
            self.pending = None;
        } else {
            tracing::debug!(generation = %self.generation, %source, "async resolution started");
            self.pending = Some(ticket);
        }
        ticket
    }

    /// Hand back the answer for `ticket`.
    ///
    /// - Stale ticket: nothing changes and `Ok(Completion::Stale)` is
    ///   returned, whether the answer was a success or a failure.
    /// - Current ticket, success: the point is applied as by
    ///   [`apply_resolved_point`](Self::apply_resolved_point) with the source
    ///   the ticket was issued for, and the provider's formatted address
    ///   replaces the typed text if present.
    /// - Current ticket, failure: the request is no longer pending, the
    ///   previous location is retained, and the failure is returned as-is.
    pub fn complete_async_resolution(
        &mut self,
        ticket: ResolutionTicket,
        outcome: Result<ResolvedAddress, ResolutionFailure>,
        registry: &ZoneRegistry,
    ) -> Result<Completion, ResolutionFailure> {
        let issued = match self.pending {
            Some(issued) if issued.generation == ticket.generation => issued,
            _ => {
                tracing::debug!(
                    ticket = %ticket.generation,
                    current = %self.generation,
                    "discarding stale resolution"
                );
                return Ok(Completion::Stale);
            }
        };
        if issued.source != ticket.source {
            tracing::debug!(
                generation = %issued.generation,
                issued = %issued.source,
                claimed = %ticket.source,
                "completion source differs from issued ticket; keeping issued source"
            );
        }

        match outcome {
            Ok(resolved) => {
                if let Some(text) = resolved.formatted_address {
                    self.raw_text = text;
                }
                let classification = self
                    .apply_resolved_point(resolved.point, issued.source, registry)
                    .clone();
                Ok(Completion::Applied { classification })
            }
            Err(failure) => {
                self.pending = None;
                tracing::debug!(
                    generation = %self.generation,
                    source = %issued.source,
                    %failure,
                    "async resolution failed"
                );
                Err(failure)
            }
        }
    }

    /// Reset to the `Empty` phase.
    ///
    /// The generation still advances so that tickets issued before the
    /// reset cannot be applied afterwards.
    pub fn clear(&mut self) {
        self.raw_text.clear();
        self.location = None;
        self.pending = None;
        self.generation = self.generation.next();
        tracing::debug!(generation = %self.generation, "address cleared");
    }

    // ── Outputs ──────────────────────────────────────────────────────

    /// Delivery gate and fee for the order form.
    pub fn checkout_quote(&self) -> CheckoutQuote {
        match self.classification() {
            Some(c) if c.is_zone() => CheckoutQuote {
                confirmed: true,
                can_submit: self.pending.is_none(),
                zone_id: c.zone_id().cloned(),
                fee_minor_units: c.fee(),
            },
            _ => CheckoutQuote::blocked(),
        }
    }

    /// Serializable view including derived fields.
    pub fn snapshot(&self) -> AddressSnapshot {
        AddressSnapshot {
            raw_text: self.raw_text.clone(),
            point: self.point(),
            classification: self.classification().cloned(),
            confirmed: self.is_confirmed(),
            source: self.source(),
            generation: self.generation,
            phase: self.phase(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
