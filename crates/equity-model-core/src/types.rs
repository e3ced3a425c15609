use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::EquityModelError;
use crate::EquityModelResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Whole percentages (30 = 30%). Used for mixes, equity offered and ownership.
pub type Percent = Decimal;

/// Ratios expressed as decimals (0.25 = 25%). Never as percentages.
pub type Rate = Decimal;

/// Revenue multiples (e.g., 7.5x annual revenue)
pub type Multiple = Decimal;

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

/// Round to whole units, halves away from zero.
///
/// For the non-negative quantities this engine rounds (customer splits,
/// ownership percentages, slider positions) this matches a spreadsheet's
/// `ROUND(x, 0)`.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole number and convert to `i64`. Saturates on values that do
/// not fit, which cannot happen for counts derived from a `u64` customer base
/// scaled by a percentage in `[0, 100]`.
pub fn round_to_i64(value: Decimal) -> i64 {
    let rounded = round_half_up(value);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Turn a `checked_*` result into an engine error naming the offending input.
pub(crate) fn checked(value: Option<Decimal>, field: &str) -> EquityModelResult<Decimal> {
    value.ok_or_else(|| EquityModelError::invalid(field, "Result is outside the representable range"))
}

/// `numerator / max(denominator, 1)`.
///
/// Averages over an empty base (no customers, no agents, no revenue) are
/// defined as the numerator itself over one, so a zero numerator gives zero.
pub fn div_floor_one(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator / denominator.max(Decimal::ONE)
}
