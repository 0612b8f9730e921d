use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates. Annual loan rates are percentages (6.5 = 6.5%), periodic rates are decimals.
pub type Rate = Decimal;

/// Decimal places of the smallest currency unit.
pub const CENT_SCALE: u32 = 2;

/// How monetary amounts are rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Midpoints round away from zero (2.345 -> 2.35).
    #[default]
    HalfUp,
    /// Banker's rounding: midpoints round to the even neighbour (2.345 -> 2.34).
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Round to cents, keeping a fixed scale of two so `to_string` always shows two digits.
    pub fn round(self, value: Money) -> Money {
        let mut rounded = value.round_dp_with_strategy(CENT_SCALE, self.strategy());
        rounded.rescale(CENT_SCALE);
        rounded
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up_midpoint() {
        assert_eq!(RoundingMode::HalfUp.round(dec!(2.345)), dec!(2.35));
        assert_eq!(RoundingMode::HalfUp.round(dec!(2.355)), dec!(2.36));
    }

    #[test]
    fn test_half_even_midpoint() {
        assert_eq!(RoundingMode::HalfEven.round(dec!(2.345)), dec!(2.34));
        assert_eq!(RoundingMode::HalfEven.round(dec!(2.355)), dec!(2.36));
    }

    #[test]
    fn test_round_keeps_two_digits() {
        assert_eq!(RoundingMode::HalfUp.round(dec!(1000)).to_string(), "1000.00");
        assert_eq!(RoundingMode::HalfUp.round(dec!(0.5)).to_string(), "0.50");
    }

    #[test]
    fn test_default_is_half_up() {
        assert_eq!(RoundingMode::default(), RoundingMode::HalfUp);
    }
}
