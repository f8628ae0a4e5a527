//! Canonical representation of one quarterly earnings announcement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// When, relative to the regular session, the report was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTime {
    PreMarket,
    PostMarket,
}

impl ReportTime {
    /// Parses vendor spellings such as `pre-market`, `post-market`, `BMO`, `AMC`.
    pub fn parse_vendor(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pre-market" | "premarket" | "bmo" => Some(ReportTime::PreMarket),
            "post-market" | "postmarket" | "amc" => Some(ReportTime::PostMarket),
            _ => None,
        }
    }
}

/// One earnings report as published by the earnings provider.
///
/// `reported_date` is the announcement date as the vendor attributes it; no
/// correction is applied for post-market releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsReport {
    pub symbol: String,
    /// Last day of the fiscal quarter the report covers.
    pub fiscal_date_ending: NaiveDate,
    /// Calendar date the report was announced.
    pub reported_date: NaiveDate,
    pub report_time: Option<ReportTime>,
    pub reported_eps: Option<f64>,
    pub estimated_eps: Option<f64>,
    /// Reported minus estimated EPS.
    pub surprise: Option<f64>,
    /// Surprise as a percentage of the estimate.
    pub surprise_pct: Option<f64>,
}
