//! Exchange-calendar helpers.
//!
//! Providers hand out bar timestamps in UTC. A daily bar's trading date is the
//! calendar date of that instant in the exchange time zone, not in UTC: Alpaca
//! stamps New York daily bars at local midnight, which is 04:00Z or 05:00Z
//! depending on DST. Going the other way, a requested date range becomes a UTC
//! interval starting at local midnight.
//!
//! Examples
//! - "2023-04-10T04:00:00Z" in America/New_York (EDT) -> 2023-04-10
//! - "2023-01-10T05:00:00Z" in America/New_York (EST) -> 2023-01-10
//! - "2023-01-10T03:00:00Z" in America/New_York (EST) -> 2023-01-09

use anyhow::Context;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Default exchange time zone.
pub const DEFAULT_EXCHANGE_TZ: &str = "America/New_York";

/// Parse an IANA zone name such as "America/New_York".
pub fn resolve_tz(name: &str) -> anyhow::Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("bad tz: {name}"))
}

/// Calendar date of `ts` in the exchange time zone.
pub fn trading_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// UTC instant of local midnight starting `date`.
///
/// Zones that spring forward at midnight have no 00:00 on that day; the first
/// valid local instant is used instead. An ambiguous midnight resolves to the
/// earlier instant.
pub fn day_start_utc(date: NaiveDate, tz: Tz) -> anyhow::Result<DateTime<Utc>> {
    first_valid_instant(date.and_time(NaiveTime::MIN), tz)
}

// Steps through a spring-forward gap a minute at a time, at most two hours.
fn first_valid_instant(naive: NaiveDateTime, tz: Tz) -> anyhow::Result<DateTime<Utc>> {
    let mut t = naive;
    for _ in 0..=120 {
        if let Some(dt) = tz.from_local_datetime(&t).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
        t += Duration::minutes(1);
    }
    anyhow::bail!("nonexistent local time {naive} in {tz}")
}

/// Half-open UTC interval `[start, end)` covering the local dates `from..=to`.
pub fn date_range_utc(
    from: NaiveDate,
    to: NaiveDate,
    tz: Tz,
) -> anyhow::Result<(DateTime<Utc>, DateTime<Utc>)> {
    if from > to {
        anyhow::bail!("range start {from} is after end {to}");
    }
    let after_last = to
        .checked_add_days(Days::new(1))
        .context("range end is at the calendar limit")?;
    Ok((day_start_utc(from, tz)?, day_start_utc(after_last, tz)?))
}
