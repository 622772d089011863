//! Error types for the rate analytics core

use thiserror::Error;

/// Failures the analytics functions report as typed values, so callers can
/// tell "no data yet" apart from a real zero.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("division by zero: {0} is zero")]
    DivisionByZero(&'static str),

    #[error("series too short: {0} aligned point(s), need at least 2")]
    EmptySeries(usize),
}
