//! # Delivery Fees
//!
//! Flat delivery fees are whole minor currency units (cents, pence).
//! Rendering to a major-unit string is a display concern only.

use serde::{Deserialize, Serialize};

/// A flat delivery fee in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeMinorUnits(pub u64);

impl FeeMinorUnits {
    /// No delivery fee.
    pub const ZERO: Self = Self(0);

    /// The raw number of minor units.
    pub fn minor_units(&self) -> u64 {
        self.0
    }

    /// Render in major units with `digits` fractional digits.
    ///
    /// `FeeMinorUnits(300).format_major(2)` is `"3.00"`;
    /// with `digits == 0` the raw value is returned.
    pub fn format_major(&self, digits: u8) -> String {
        if digits == 0 {
            return self.0.to_string();
        }
        let scale = 10u64.pow(u32::from(digits));
        format!(
            "{}.{:0width$}",
            self.0 / scale,
            self.0 % scale,
            width = usize::from(digits)
        )
    }
}

impl std::fmt::Display for FeeMinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_major() {
        assert_eq!(FeeMinorUnits(300).format_major(2), "3.00");
        assert_eq!(FeeMinorUnits(705).format_major(2), "7.05");
        assert_eq!(FeeMinorUnits(5).format_major(3), "0.005");
        assert_eq!(FeeMinorUnits(1500).format_major(0), "1500");
        assert_eq!(FeeMinorUnits::ZERO.format_major(2), "0.00");
    }

    #[test]
    fn test_serde_transparent() {
        assert_eq!(serde_json::to_string(&FeeMinorUnits(700)).unwrap(), "700");
        let fee: FeeMinorUnits = serde_json::from_str("300").unwrap();
        assert_eq!(fee, FeeMinorUnits(300));
    }
}
