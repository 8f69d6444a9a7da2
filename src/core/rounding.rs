use rust_decimal::prelude::*;

/// Rounds to 2 decimal places, half to even, on the value's decimal form.
///
/// Non-finite values are returned unchanged.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
