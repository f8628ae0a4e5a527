//! Return and extremum search within one window.

use chrono::NaiveDate;

use crate::{
    error::AnalysisError,
    models::{CombinedRecord, ReturnStats},
};

/// Percentage return of every priced record versus the anchor close, reduced
/// to the maximum and its signed day offset from the anchor.
///
/// Records without a finite close are ignored. On equal returns the earliest
/// date wins.
///
/// Errors:
/// - [`AnalysisError::EmptyWindow`] if `window` is empty
/// - [`AnalysisError::MissingAnchorPrice`] if no record at `anchor` has a finite close
/// - [`AnalysisError::DivisionByZero`] if the anchor close is zero
pub fn compute_returns(
    window: &[CombinedRecord],
    anchor: NaiveDate,
) -> Result<ReturnStats, AnalysisError> {
    if window.is_empty() {
        return Err(AnalysisError::EmptyWindow { anchor });
    }

    let anchor_close = window
        .iter()
        .filter(|r| r.date == anchor)
        .find_map(CombinedRecord::close)
        .ok_or(AnalysisError::MissingAnchorPrice { anchor })?;
    if anchor_close == 0.0 {
        return Err(AnalysisError::DivisionByZero { anchor });
    }

    let mut best: Option<(NaiveDate, f64)> = None;
    let mut observations = 0usize;
    for rec in window {
        let Some(close) = rec.close() else { continue };
        observations += 1;
        let pct = (close / anchor_close - 1.0) * 100.0;
        best = match best {
            Some((date, max)) if pct < max || (pct == max && date <= rec.date) => {
                Some((date, max))
            }
            _ => Some((rec.date, pct)),
        };
    }

    // The anchor record itself is priced, so `best` is set.
    let (max_return_date, max_return_pct) =
        best.ok_or(AnalysisError::MissingAnchorPrice { anchor })?;

    Ok(ReturnStats {
        max_return_pct,
        max_return_date,
        days_to_max: (max_return_date - anchor).num_days(),
        observations,
    })
}

/// Mean `high - low` over records with a price, or `None` when there are none.
pub fn average_daily_range(window: &[CombinedRecord]) -> Option<f64> {
    let (sum, n) = window
        .iter()
        .filter_map(CombinedRecord::daily_range)
        .fold((0.0, 0usize), |(s, n), r| (s + r, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ohlcv;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, day).unwrap()
    }

    fn priced(day: u32, close: f64) -> CombinedRecord {
        CombinedRecord {
            date: d(day),
            price: Some(Ohlcv {
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 0.0,
            }),
            earnings: None,
        }
    }

    #[test]
    fn empty_window_errors() {
        assert_eq!(
            compute_returns(&[], d(10)),
            Err(AnalysisError::EmptyWindow { anchor: d(10) })
        );
    }

    #[test]
    fn anchor_without_price_errors() {
        let w = [CombinedRecord::empty(d(10)), priced(11, 5.0)];
        assert_eq!(
            compute_returns(&w, d(10)),
            Err(AnalysisError::MissingAnchorPrice { anchor: d(10) })
        );
    }

    #[test]
    fn nan_anchor_close_counts_as_missing() {
        let w = [priced(10, f64::NAN), priced(11, 5.0)];
        assert_eq!(
            compute_returns(&w, d(10)),
            Err(AnalysisError::MissingAnchorPrice { anchor: d(10) })
        );
    }

    #[test]
    fn zero_anchor_close_errors() {
        let w = [priced(10, 0.0), priced(11, 5.0)];
        assert_eq!(
            compute_returns(&w, d(10)),
            Err(AnalysisError::DivisionByZero { anchor: d(10) })
        );
    }

    #[test]
    fn max_before_anchor_gives_negative_offset() {
        let w = [priced(6, 120.0), priced(7, 90.0), priced(10, 100.0), priced(11, 105.0)];
        let stats = compute_returns(&w, d(10)).unwrap();
        assert!((stats.max_return_pct - 20.0).abs() < 1e-9);
        assert_eq!(stats.days_to_max, -4);
        assert_eq!(stats.max_return_date, d(6));
        assert_eq!(stats.observations, 4);
    }

    #[test]
    fn ties_resolve_to_earliest_date() {
        let w = [priced(10, 100.0), priced(11, 110.0), priced(12, 110.0)];
        let stats = compute_returns(&w, d(10)).unwrap();
        assert_eq!(stats.days_to_max, 1);
    }

    #[test]
    fn all_declines_keep_anchor_as_max() {
        let w = [priced(10, 100.0), priced(11, 95.0), priced(12, 90.0)];
        let stats = compute_returns(&w, d(10)).unwrap();
        assert_eq!(stats.max_return_pct, 0.0);
        assert_eq!(stats.days_to_max, 0);
    }

    #[test]
    fn unpriced_records_are_skipped() {
        let w = [priced(10, 100.0), CombinedRecord::empty(d(11)), priced(12, 101.0)];
        let stats = compute_returns(&w, d(10)).unwrap();
        assert_eq!(stats.observations, 2);
        assert_eq!(stats.days_to_max, 2);
    }

    #[test]
    fn daily_range_average() {
        let w = [priced(10, 100.0), CombinedRecord::empty(d(11)), priced(12, 50.0)];
        assert_eq!(average_daily_range(&w), Some(2.0));
        assert_eq!(average_daily_range(&[CombinedRecord::empty(d(11))]), None);
    }
}
