//! Fixed-point rounding policy for reported amounts.
//!
//! All derived results are rounded here rather than at render time, so the
//! same query yields the same digits on every platform. Coin and ratio
//! amounts carry 8 decimal places; USD amounts and percentages carry 2.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for cross-rates and native-coin amounts.
pub const RATIO_DECIMALS: u32 = 8;
/// Decimal places for USD amounts.
pub const USD_DECIMALS: u32 = 2;
/// Decimal places for percentages.
pub const PERCENT_DECIMALS: u32 = 2;

/// Rounds half-up (midpoint away from zero) to `decimals` places.
///
/// Non-finite values pass through unchanged; callers guard denominators
/// before arithmetic, so those never reach a success result.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
