use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    models::{
        earnings::{EarningsReport, ReportTime},
        request_params::EarningsRequestParams,
    },
    providers::{ApiSnafu, InternalSnafu, ProviderError},
};

/// Body of `GET /query?function=EARNINGS`.
///
/// Alpha Vantage answers errors and throttling with HTTP 200 and a single
/// `Error Message`, `Information` or `Note` key, so those are modelled here too.
#[derive(Deserialize, Debug, Default)]
pub struct EarningsResponse {
    pub symbol: Option<String>,
    #[serde(rename = "quarterlyEarnings", default)]
    pub quarterly_earnings: Vec<QuarterlyEarnings>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
}

/// One quarterly entry. Every numeric field arrives as a string and may be `"None"`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyEarnings {
    pub fiscal_date_ending: String,
    pub reported_date: String,
    #[serde(rename = "reportedEPS")]
    pub reported_eps: Option<String>,
    #[serde(rename = "estimatedEPS")]
    pub estimated_eps: Option<String>,
    pub surprise: Option<String>,
    pub surprise_percentage: Option<String>,
    pub report_time: Option<String>,
}

/// Parses a vendor numeric string; `"None"`, `"-"` and blanks are absent.
pub fn parse_vendor_number(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") || s == "-" {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ProviderError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        InternalSnafu {
            message: format!("bad {field} '{raw}': {e}"),
        }
        .build()
    })
}

impl QuarterlyEarnings {
    pub fn into_report(self, symbol: &str) -> Result<EarningsReport, ProviderError> {
        Ok(EarningsReport {
            symbol: symbol.to_string(),
            fiscal_date_ending: parse_date("fiscalDateEnding", &self.fiscal_date_ending)?,
            reported_date: parse_date("reportedDate", &self.reported_date)?,
            report_time: self.report_time.as_deref().and_then(ReportTime::parse_vendor),
            reported_eps: parse_vendor_number(self.reported_eps.as_deref()),
            estimated_eps: parse_vendor_number(self.estimated_eps.as_deref()),
            surprise: parse_vendor_number(self.surprise.as_deref()),
            surprise_pct: parse_vendor_number(self.surprise_percentage.as_deref()),
        })
    }
}

impl EarningsResponse {
    /// Converts the body into reports announced within the requested range,
    /// ascending by announcement date.
    pub fn into_reports(
        self,
        params: &EarningsRequestParams,
    ) -> Result<Vec<EarningsReport>, ProviderError> {
        if let Some(message) = self.error_message.or(self.note).or(self.information) {
            return ApiSnafu { message }.fail();
        }
        if self.symbol.is_none() && self.quarterly_earnings.is_empty() {
            return ApiSnafu {
                message: format!("empty earnings payload for {}", params.symbol),
            }
            .fail();
        }

        let mut reports = Vec::with_capacity(self.quarterly_earnings.len());
        for entry in self.quarterly_earnings {
            let report = entry.into_report(&params.symbol)?;
            if params.contains(report.reported_date) {
                reports.push(report);
            }
        }
        reports.sort_by_key(|r| r.reported_date);
        Ok(reports)
    }
}
