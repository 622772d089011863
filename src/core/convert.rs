//! Spot conversion between two assets.

use crate::core::market::Asset;
use crate::core::rounding::{RATIO_DECIMALS, round_half_up};

/// Result of converting an amount at current spot prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub converted_amount: f64,
    pub unit_rate: f64,
}

impl ConversionResult {
    /// The "not yet ready to compute" result.
    pub fn zero() -> Self {
        ConversionResult {
            converted_amount: 0.0,
            unit_rate: 0.0,
        }
    }
}

/// Converts `amount` of `from` into units of `to` at current spot prices.
///
/// `unit_rate` is `from.current_price_usd / to.current_price_usd`, i.e. how
/// many units of `to` one unit of `from` buys. Returns the zero result, not
/// an error, when the to-asset price is zero or any input is absent: the
/// caller invokes this continuously while the user is still picking inputs,
/// and an incomplete selection is not a fault.
///
/// The amount is not validated here. Rejecting negative or non-finite input
/// with a user-facing message is the caller's responsibility.
pub fn convert(amount: Option<f64>, from: Option<&Asset>, to: Option<&Asset>) -> ConversionResult {
    let (Some(amount), Some(from), Some(to)) = (amount, from, to) else {
        return ConversionResult::zero();
    };
    if to.current_price_usd == 0.0 {
        return ConversionResult::zero();
    }

    let unit_rate = from.current_price_usd / to.current_price_usd;
    let converted_amount = amount * unit_rate;

    ConversionResult {
        converted_amount: round_half_up(converted_amount, RATIO_DECIMALS),
        unit_rate: round_half_up(unit_rate, RATIO_DECIMALS),
    }
}
