use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Ratios reported as percentages (7.25 = 7.25%), e.g. cap rate, CoC.
pub type Percent = Decimal;

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

/// Raise `base` to a non-negative integer power by binary exponentiation.
///
/// Used instead of `powd` so that every caller computing the same power gets
/// the identical decimal result. Saturates at the decimal range instead of
/// panicking, and takes at most 64 multiplications for any `periods`.
pub fn compound(base: Decimal, periods: u32) -> Decimal {
    let mut acc = Decimal::ONE;
    let mut square = base;
    let mut remaining = periods;
    while remaining > 0 {
        if remaining & 1 == 1 {
            acc = acc.saturating_mul(square);
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.saturating_mul(square);
        }
    }
    acc
}
