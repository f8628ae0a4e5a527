//! Conversion of provider models into date-keyed analysis records.

use chrono_tz::Tz;
use market_data_ingestor::models::{bar::Bar, earnings::EarningsReport};

use crate::{
    models::{EarningsEvent, PriceBar},
    tz::trading_date,
};

/// Re-key provider bars by their trading date in `tz`.
pub fn price_bars(bars: &[Bar], tz: Tz) -> Vec<PriceBar> {
    bars.iter()
        .map(|b| PriceBar {
            date: trading_date(b.timestamp, tz),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        })
        .collect()
}

/// Earnings events keyed by the vendor's announcement date.
pub fn earnings_events(reports: &[EarningsReport]) -> Vec<EarningsEvent> {
    reports
        .iter()
        .map(|r| EarningsEvent {
            date: r.reported_date,
            reported_eps: r.reported_eps,
            estimated_eps: r.estimated_eps,
            surprise_pct: r.surprise_pct,
            report_time: r.report_time,
        })
        .collect()
}
