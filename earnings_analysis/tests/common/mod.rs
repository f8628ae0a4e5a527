#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use earnings_analysis::models::{EarningsEvent, PriceBar};
use market_data_ingestor::{
    models::{
        bar::Bar,
        bar_series::BarSeries,
        earnings::EarningsReport,
        request_params::{BarsRequestParams, EarningsRequestParams},
        timeframe::TimeFrame,
    },
    providers::{ApiSnafu, DataProvider, EarningsProvider, ProviderError},
};
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Flat bar: open = high = low = close.
pub fn bar(date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000.0,
    }
}

pub fn event(date: NaiveDate) -> EarningsEvent {
    EarningsEvent::new(date, Some(1.0))
}

/// Provider bar stamped the way Alpaca stamps New York daily bars in summer
/// (local midnight, EDT).
pub fn vendor_bar(date: NaiveDate, close: f64) -> Bar {
    let ts = Utc
        .from_utc_datetime(&date.and_hms_opt(4, 0, 0).unwrap());
    Bar {
        timestamp: ts,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 10_000.0,
        trade_count: None,
        vwap: None,
    }
}

pub fn report(symbol: &str, reported: NaiveDate, eps: Option<f64>) -> EarningsReport {
    EarningsReport {
        symbol: symbol.to_string(),
        fiscal_date_ending: reported,
        reported_date: reported,
        report_time: None,
        reported_eps: eps,
        estimated_eps: None,
        surprise: None,
        surprise_pct: None,
    }
}

/// In-memory bar source that records the last request.
pub struct FakeBars {
    pub series: Vec<BarSeries>,
    pub fail: bool,
    pub last_request: Mutex<Option<BarsRequestParams>>,
}

impl FakeBars {
    pub fn new(symbol: &str, bars: Vec<Bar>) -> Self {
        Self {
            series: vec![BarSeries {
                symbol: symbol.to_string(),
                timeframe: TimeFrame::day(),
                bars,
            }],
            fail: false,
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            series: vec![],
            fail: true,
            last_request: Mutex::new(None),
        }
    }
}

#[async_trait]
impl DataProvider for FakeBars {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        *self.last_request.lock().unwrap() = Some(params);
        if self.fail {
            return ApiSnafu { message: "403 Forbidden: forbidden" }.fail();
        }
        Ok(self.series.clone())
    }
}

/// In-memory earnings source honouring the requested date range.
pub struct FakeEarnings {
    pub reports: Vec<EarningsReport>,
}

#[async_trait]
impl EarningsProvider for FakeEarnings {
    async fn fetch_earnings(
        &self,
        params: EarningsRequestParams,
    ) -> Result<Vec<EarningsReport>, ProviderError> {
        Ok(self
            .reports
            .iter()
            .filter(|r| r.symbol == params.symbol && params.contains(r.reported_date))
            .cloned()
            .collect())
    }
}
