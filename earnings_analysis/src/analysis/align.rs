//! Outer join of daily prices and earnings events on the calendar date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{CombinedRecord, EarningsEvent, PriceBar};

/// Merge both series into one record per date present in either input.
///
/// The output is ascending with unique dates. A date present on one side only
/// gets `None` for the other side. If one input repeats a date, the entry that
/// comes later in that input wins.
pub fn align(prices: &[PriceBar], earnings: &[EarningsEvent]) -> Vec<CombinedRecord> {
    let mut by_date: BTreeMap<NaiveDate, CombinedRecord> = BTreeMap::new();

    for bar in prices {
        let rec = by_date
            .entry(bar.date)
            .or_insert_with(|| CombinedRecord::empty(bar.date));
        if rec.price.replace(bar.ohlcv()).is_some() {
            tracing::debug!(date = %bar.date, "duplicate price bar, keeping the later one");
        }
    }

    for event in earnings {
        let rec = by_date
            .entry(event.date)
            .or_insert_with(|| CombinedRecord::empty(event.date));
        if rec.earnings.replace(event.figures()).is_some() {
            tracing::debug!(date = %event.date, "duplicate earnings event, keeping the later one");
        }
    }

    by_date.into_values().collect()
}
