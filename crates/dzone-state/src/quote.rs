//! # Checkout Quote
//!
//! What the checkout form reads from an address session: whether the order
//! may be submitted, and the delivery fee to add to the total.

use serde::{Deserialize, Serialize};

use dzone_core::{FeeMinorUnits, ZoneId};

/// Delivery gate and fee for the order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    /// The resolved address classifies into a delivery zone.
    pub confirmed: bool,
    /// Confirmed and no newer resolution is in flight.
    pub can_submit: bool,
    /// Zone label for display, when confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<ZoneId>,
    /// Fee to add to the order total, when confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_minor_units: Option<FeeMinorUnits>,
}

impl CheckoutQuote {
    /// A quote that blocks submission.
    pub fn blocked() -> Self {
        Self {
            confirmed: false,
            can_submit: false,
            zone_id: None,
            fee_minor_units: None,
        }
    }

    /// Order total including delivery, or `None` if the order cannot be
    /// submitted or the sum overflows.
    pub fn order_total(&self, subtotal: FeeMinorUnits) -> Option<FeeMinorUnits> {
        if !self.can_submit {
            return None;
        }
        let fee = self.fee_minor_units?;
        subtotal.0.checked_add(fee.0).map(FeeMinorUnits)
    }
}
