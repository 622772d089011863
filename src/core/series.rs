//! Pairs two daily price series into a single cross-rate series.

use crate::core::market::PricePoint;
use chrono::{TimeZone, Utc};
use tracing::debug;

/// One time-synchronized pair of price points plus the derived cross-rate.
///
/// `cross_rate` is the exchange rate `1 from-asset = cross_rate to-assets`,
/// derived as `to_price_usd / from_price_usd`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedObservation {
    pub timestamp_millis: i64,
    pub from_price_usd: f64,
    pub to_price_usd: f64,
    pub cross_rate: f64,
    pub date_label: String,
}

/// Merges two independently-fetched daily series into one ordered sequence
/// of aligned observations.
///
/// Pairing is strictly by position: index `i` of `from_series` is paired
/// with index `i` of `to_series`. When the series differ in length the
/// output truncates to the shorter one; when `from_series[i].usd_price` is
/// zero the observation is dropped rather than producing an undefined rate.
/// The output may therefore be shorter than either input. Pure and
/// deterministic: identical inputs always yield identical outputs.
pub fn align(from_series: &[PricePoint], to_series: &[PricePoint]) -> Vec<AlignedObservation> {
    if from_series.len() != to_series.len() {
        debug!(
            from_len = from_series.len(),
            to_len = to_series.len(),
            "Series lengths differ, truncating to the shorter"
        );
    }

    from_series
        .iter()
        .zip(to_series.iter())
        .filter(|(from, _)| from.usd_price != 0.0)
        .map(|(from, to)| AlignedObservation {
            timestamp_millis: from.timestamp_millis,
            from_price_usd: from.usd_price,
            to_price_usd: to.usd_price,
            cross_rate: to.usd_price / from.usd_price,
            date_label: format_date_label(from.timestamp_millis),
        })
        .collect()
}

/// Short month-and-day label for a millisecond UTC timestamp, e.g. "Jan 5".
///
/// The format is pinned: English month abbreviations, UTC, no day padding.
pub fn format_date_label(timestamp_millis: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(timestamp_millis: i64, usd_price: f64) -> PricePoint {
        PricePoint {
            timestamp_millis,
            usd_price,
        }
    }

    // 2024-01-05T00:00:00Z
    const T0: i64 = 1_704_412_800_000;
    const DAY: i64 = 86_400_000;

    #[test]
    fn test_pairs_by_position_and_derives_cross_rate() {
        let from = vec![point(T0, 100.0), point(T0 + DAY, 110.0)];
        let to = vec![point(T0, 10.0), point(T0 + DAY, 10.0)];

        let observations = align(&from, &to);

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].cross_rate, 0.1);
        assert!((observations[1].cross_rate - 10.0 / 110.0).abs() < 1e-12);
        assert_eq!(observations[0].from_price_usd, 100.0);
        assert_eq!(observations[0].to_price_usd, 10.0);
        assert_eq!(observations[0].timestamp_millis, T0);
    }

    #[test]
    fn test_truncates_to_shorter_series() {
        let from = vec![point(T0, 100.0), point(T0 + DAY, 110.0), point(T0 + 2 * DAY, 120.0)];
        let to = vec![point(T0, 10.0), point(T0 + DAY, 11.0)];

        assert_eq!(align(&from, &to).len(), 2);
        assert_eq!(align(&to, &from).len(), 2);
    }

    #[test]
    fn test_drops_zero_denominator_observations() {
        let from = vec![point(T0, 100.0), point(T0 + DAY, 0.0), point(T0 + 2 * DAY, 120.0)];
        let to = vec![point(T0, 10.0), point(T0 + DAY, 11.0), point(T0 + 2 * DAY, 12.0)];

        let observations = align(&from, &to);

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].timestamp_millis, T0);
        assert_eq!(observations[1].timestamp_millis, T0 + 2 * DAY);
        assert!(observations.iter().all(|o| o.cross_rate.is_finite()));
    }

    #[test]
    fn test_zero_to_price_is_kept_as_zero_rate() {
        // Only the denominator is guarded; a zero numerator is a real rate.
        let from = vec![point(T0, 100.0)];
        let to = vec![point(T0, 0.0)];

        let observations = align(&from, &to);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].cross_rate, 0.0);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let from = vec![point(T0, 100.0), point(T0 + DAY, 110.0)];
        let to = vec![point(T0, 10.0), point(T0 + DAY, 11.0)];

        assert_eq!(align(&from, &to), align(&from, &to));
    }

    #[test]
    fn test_reversed_arguments_invert_the_rate() {
        let from = vec![point(T0, 100.0), point(T0 + DAY, 110.0), point(T0 + 2 * DAY, 95.5)];
        let to = vec![point(T0, 10.0), point(T0 + DAY, 11.5), point(T0 + 2 * DAY, 9.25)];

        let forward = align(&from, &to);
        let backward = align(&to, &from);

        assert_eq!(forward.len(), backward.len());
        for (a, b) in forward.iter().zip(backward.iter()) {
            assert!((a.cross_rate - 1.0 / b.cross_rate).abs() < 1e-12);
        }
    }

    #[test]
    fn test_preserves_input_ordering() {
        let from = vec![point(T0, 100.0), point(T0 + DAY, 110.0), point(T0 + 2 * DAY, 120.0)];
        let to = vec![point(T0, 10.0), point(T0 + DAY, 11.0), point(T0 + 2 * DAY, 12.0)];

        let observations = align(&from, &to);
        let timestamps: Vec<i64> = observations.iter().map(|o| o.timestamp_millis).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn test_date_label_is_pinned_format() {
        assert_eq!(format_date_label(T0), "Jan 5");
        // 2024-11-23T00:00:00Z
        assert_eq!(format_date_label(1_732_320_000_000), "Nov 23");
    }

    #[test]
    fn test_empty_inputs_align_to_empty() {
        assert!(align(&[], &[]).is_empty());
        assert!(align(&[point(T0, 1.0)], &[]).is_empty());
    }
}
