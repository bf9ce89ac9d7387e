//! # dzone-state — Address Confirmation
//!
//! Tracks one checkout session's delivery address from typed text to a
//! classified coordinate, and derives whether the order may be submitted.
//!
//! ## Components
//!
//! - **Address** (`address.rs`): [`AddressState`] and its transitions
//!   (`set_address_text`, `apply_resolved_point`, `begin_async_resolution`,
//!   `complete_async_resolution`, `clear`).
//!
//! - **Tickets** (`ticket.rs`): [`Generation`] counter and
//!   [`ResolutionTicket`] for discarding out-of-order async answers.
//!
//! - **Quote** (`quote.rs`): [`CheckoutQuote`], the confirmed flag and fee
//!   the order form reads.
//!
//! - **Errors** (`error.rs`): collaborator failures surfaced unchanged.
//!
//! ## Design
//!
//! Async collaborators (geocoding, device geolocation) are not called from
//! here. The caller runs them and reports the outcome with the ticket it was
//! given; the state machine decides whether the outcome is still wanted.
//! Classification is recomputed on every coordinate change and never
//! inferred from text.

pub mod address;
pub mod error;
pub mod quote;
pub mod ticket;

// ─── Address re-exports ─────────────────────────────────────────────

pub use address::{AddressPhase, AddressSnapshot, AddressState, Completion, ResolvedLocation};

// ─── Ticket re-exports ──────────────────────────────────────────────

pub use ticket::{Generation, ResolutionTicket, ResolvedAddress};

// ─── Output and error re-exports ────────────────────────────────────

pub use error::{GeocodingError, GeolocationError, ResolutionFailure};
pub use quote::CheckoutQuote;
