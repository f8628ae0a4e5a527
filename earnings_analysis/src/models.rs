//! Records flowing through the analysis: daily bars, earnings events, the
//! combined per-date series and the per-anchor results.

use chrono::NaiveDate;
use market_data_ingestor::models::earnings::ReportTime;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Open/high/low/close/volume of one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

/// One daily price bar keyed by its trading date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date in the exchange time zone.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl PriceBar {
    /// The price columns without the date.
    pub fn ohlcv(&self) -> Ohlcv {
        Ohlcv {
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Figures published with an earnings announcement. Every field may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EarningsFigures {
    /// Reported earnings per share.
    pub reported_eps: Option<f64>,
    /// Consensus estimate.
    pub estimated_eps: Option<f64>,
    /// Surprise relative to the estimate, in percent.
    pub surprise_pct: Option<f64>,
    /// Release time relative to the regular session.
    pub report_time: Option<ReportTime>,
}

/// An earnings announcement keyed by its calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    /// Announcement date.
    pub date: NaiveDate,
    /// Reported earnings per share.
    pub reported_eps: Option<f64>,
    /// Consensus estimate.
    pub estimated_eps: Option<f64>,
    /// Surprise relative to the estimate, in percent.
    pub surprise_pct: Option<f64>,
    /// Release time relative to the regular session.
    pub report_time: Option<ReportTime>,
}

impl EarningsEvent {
    /// An event with only a date and a reported EPS.
    pub fn new(date: NaiveDate, reported_eps: Option<f64>) -> Self {
        Self {
            date,
            reported_eps,
            estimated_eps: None,
            surprise_pct: None,
            report_time: None,
        }
    }

    /// The announcement columns without the date.
    pub fn figures(&self) -> EarningsFigures {
        EarningsFigures {
            reported_eps: self.reported_eps,
            estimated_eps: self.estimated_eps,
            surprise_pct: self.surprise_pct,
            report_time: self.report_time,
        }
    }
}

/// One row of the outer join of prices and earnings.
///
/// At least one of `price` and `earnings` is present for records produced by
/// [`align`](crate::analysis::align::align).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    /// Calendar date shared by both sides.
    pub date: NaiveDate,
    /// Price columns, if a bar exists for the date.
    pub price: Option<Ohlcv>,
    /// Earnings columns, if an announcement falls on the date.
    pub earnings: Option<EarningsFigures>,
}

impl CombinedRecord {
    /// A record with neither side filled in.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            price: None,
            earnings: None,
        }
    }

    /// Closing price if present and finite.
    pub fn close(&self) -> Option<f64> {
        self.price.map(|p| p.close).filter(|c| c.is_finite())
    }

    /// `high - low` if both are present and finite.
    pub fn daily_range(&self) -> Option<f64> {
        self.price
            .map(|p| p.high - p.low)
            .filter(|r| r.is_finite())
    }

    /// True when an earnings announcement falls on this date.
    pub fn is_anchor(&self) -> bool {
        self.earnings.is_some()
    }
}

/// Outcome of the return/extremum search over one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStats {
    /// Largest percentage return versus the anchor close.
    pub max_return_pct: f64,
    /// Date on which the largest return occurs (earliest on ties).
    pub max_return_date: NaiveDate,
    /// Signed calendar days from the anchor to `max_return_date`.
    pub days_to_max: i64,
    /// Records in the window that carried a finite close.
    pub observations: usize,
}

/// Post-earnings statistics for one anchor date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    /// Earnings announcement date the window is centred on.
    pub anchor_date: NaiveDate,
    /// Largest percentage return versus the anchor close.
    pub max_return_pct: f64,
    /// Signed calendar days from the anchor to the maximum.
    pub days_to_max: i64,
    /// Date of the maximum.
    pub max_return_date: NaiveDate,
    /// Mean `high - low` across priced records of the window.
    pub avg_daily_range: Option<f64>,
    /// Priced records in the window.
    pub observations: usize,
}

/// An anchor that produced no result, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAnchor {
    /// Earnings announcement date that was skipped.
    pub anchor_date: NaiveDate,
    /// Why it was skipped.
    #[serde(serialize_with = "serialize_display")]
    pub reason: AnalysisError,
}

/// Everything one aggregator pass produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisRun {
    /// One result per anchor that could be evaluated, ascending by anchor.
    pub results: Vec<WindowResult>,
    /// Anchors that could not be evaluated, ascending by anchor.
    pub skipped: Vec<SkippedAnchor>,
}

/// A result joined with the combined row at its anchor date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedResult {
    /// The window statistics.
    pub result: WindowResult,
    /// The combined row at `result.anchor_date`, if the series contains it.
    pub record: Option<CombinedRecord>,
}

fn serialize_display<S: serde::Serializer>(
    value: &AnalysisError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
