//! Profit/loss calculations over an aligned cross-rate series.

use crate::core::error::AnalyticsError;
use crate::core::rounding::{PERCENT_DECIMALS, RATIO_DECIMALS, USD_DECIMALS, round_half_up};
use crate::core::series::AlignedObservation;

/// Profit/loss of holding the rate position from `start` to `current`,
/// reported in ratio units, USD, and each asset's native units.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitBreakdown {
    pub ratio_delta: f64,
    pub ratio_percent: f64,
    pub usd_delta: f64,
    pub usd_percent: f64,
    pub from_asset_delta: f64,
    pub to_asset_delta: f64,
}

impl ProfitBreakdown {
    /// Zero counts as non-loss.
    pub fn is_profitable(&self) -> bool {
        self.ratio_delta >= 0.0
    }
}

/// Start-vs-latest comparison of the cross-rate over a historical window.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub start_rate: f64,
    pub current_rate: f64,
    pub percent_change: f64,
}

/// Computes the profit breakdown between one observation and the series
/// start.
///
/// Both USD valuations are priced with the current observation's
/// `to_price_usd`; the start rate is not revalued at its own day's price.
/// That isolates the rate change from the to-asset's own USD drift.
///
/// Ratio and native-coin amounts are rounded to 8 places, USD amounts and
/// percentages to 2, half-up.
pub fn point_profit(
    current: &AlignedObservation,
    start: &AlignedObservation,
) -> Result<ProfitBreakdown, AnalyticsError> {
    if start.cross_rate == 0.0 {
        return Err(AnalyticsError::DivisionByZero("start cross-rate"));
    }
    if current.from_price_usd == 0.0 {
        return Err(AnalyticsError::DivisionByZero("from-asset price"));
    }
    if current.to_price_usd == 0.0 {
        return Err(AnalyticsError::DivisionByZero("to-asset price"));
    }

    let ratio_delta = current.cross_rate - start.cross_rate;
    let ratio_percent = ratio_delta / start.cross_rate * 100.0;

    let start_value_usd = start.cross_rate * current.to_price_usd;
    let current_value_usd = current.cross_rate * current.to_price_usd;
    let usd_delta = current_value_usd - start_value_usd;
    let usd_percent = usd_delta / start_value_usd * 100.0;

    let from_asset_delta = usd_delta / current.from_price_usd;
    let to_asset_delta = usd_delta / current.to_price_usd;

    Ok(ProfitBreakdown {
        ratio_delta: round_half_up(ratio_delta, RATIO_DECIMALS),
        ratio_percent: round_half_up(ratio_percent, PERCENT_DECIMALS),
        usd_delta: round_half_up(usd_delta, USD_DECIMALS),
        usd_percent: round_half_up(usd_percent, PERCENT_DECIMALS),
        from_asset_delta: round_half_up(from_asset_delta, RATIO_DECIMALS),
        to_asset_delta: round_half_up(to_asset_delta, RATIO_DECIMALS),
    })
}

/// Summarizes the rate change from the first to the last observation.
///
/// Percentage change over fewer than two points is undefined and reported
/// as `EmptySeries`, never computed as zero.
pub fn period_summary(series: &[AlignedObservation]) -> Result<PeriodSummary, AnalyticsError> {
    if series.len() < 2 {
        return Err(AnalyticsError::EmptySeries(series.len()));
    }

    let start_rate = series[0].cross_rate;
    let current_rate = series[series.len() - 1].cross_rate;
    if start_rate == 0.0 {
        return Err(AnalyticsError::DivisionByZero("start cross-rate"));
    }

    let percent_change = (current_rate - start_rate) / start_rate * 100.0;

    Ok(PeriodSummary {
        start_rate: round_half_up(start_rate, RATIO_DECIMALS),
        current_rate: round_half_up(current_rate, RATIO_DECIMALS),
        percent_change: round_half_up(percent_change, PERCENT_DECIMALS),
    })
}
