//! Calendar-day window extraction around an anchor date.

use chrono::{Days, NaiveDate};

use crate::models::CombinedRecord;

/// Records with `anchor - days_before <= date <= anchor + days_after`.
///
/// `combined` must be ascending by date, as [`align`](super::align) produces it.
/// Bounds saturate at the calendar limits instead of overflowing.
pub fn extract_window(
    combined: &[CombinedRecord],
    anchor: NaiveDate,
    days_before: u32,
    days_after: u32,
) -> &[CombinedRecord] {
    let lo = anchor
        .checked_sub_days(Days::new(days_before.into()))
        .unwrap_or(NaiveDate::MIN);
    let hi = anchor
        .checked_add_days(Days::new(days_after.into()))
        .unwrap_or(NaiveDate::MAX);

    let start = combined.partition_point(|r| r.date < lo);
    let end = combined.partition_point(|r| r.date <= hi).max(start);
    &combined[start..end]
}
