//! Fetch, normalise, align and analyse one ticker.

use chrono::{Days, NaiveDate};
use chrono_tz::Tz;
use market_data_ingestor::{
    models::{
        asset::AssetClass,
        request_params::{BarsRequestParams, EarningsRequestParams, ProviderParams},
        timeframe::TimeFrame,
    },
    providers::{DataProvider, EarningsProvider},
};
use serde::Serialize;

use crate::{
    analysis::{aggregate::analyze_run, align::align, normalize},
    error::PipelineError,
    models::{AnalysisRun, CombinedRecord},
    tz::date_range_utc,
};

/// Window size and calendar used for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    /// Calendar days before each anchor.
    pub days_before: u32,
    /// Calendar days after each anchor.
    pub days_after: u32,
    /// Exchange time zone that turns bar timestamps into trading dates.
    pub timezone: Tz,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            days_before: 5,
            days_after: 20,
            timezone: chrono_tz::America::New_York,
        }
    }
}

/// What to analyse.
#[derive(Debug, Clone)]
pub struct TickerRequest {
    /// Ticker symbol.
    pub symbol: String,
    /// First date (inclusive) for earnings announcements.
    pub from: NaiveDate,
    /// Last date (inclusive) for earnings announcements.
    pub to: NaiveDate,
    /// Vendor options forwarded to the bar provider.
    pub provider_params: ProviderParams,
}

/// Everything computed for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerAnalysis {
    /// Ticker symbol.
    pub symbol: String,
    /// Aligned price and earnings series.
    #[serde(skip)]
    pub combined: Vec<CombinedRecord>,
    /// Per-anchor results and skipped anchors.
    #[serde(flatten)]
    pub run: AnalysisRun,
}

/// Fetch both series for `req.symbol`, align them and run the aggregator.
///
/// Earnings are requested for `[from, to]`. Bars are requested with the window
/// margins added on both sides so anchors near the range edges see full
/// windows. A ticker the bar provider has no data for yields an analysis in
/// which every anchor is skipped.
///
/// Errors:
/// - [`PipelineError::InvalidRange`] when `from > to`
/// - [`PipelineError::Bars`] / [`PipelineError::Earnings`] when a provider fails
pub async fn analyze_ticker(
    bars: &dyn DataProvider,
    earnings: &dyn EarningsProvider,
    req: &TickerRequest,
    settings: &AnalysisSettings,
) -> Result<TickerAnalysis, PipelineError> {
    if req.from > req.to {
        return Err(PipelineError::InvalidRange {
            from: req.from,
            to: req.to,
        });
    }

    let bars_from = req
        .from
        .checked_sub_days(Days::new(settings.days_before.into()))
        .unwrap_or(req.from);
    let bars_to = req
        .to
        .checked_add_days(Days::new(settings.days_after.into()))
        .unwrap_or(req.to);
    let (start, end) =
        date_range_utc(bars_from, bars_to, settings.timezone).map_err(PipelineError::Calendar)?;

    let series = bars
        .fetch_bars(BarsRequestParams {
            symbols: vec![req.symbol.clone()],
            timeframe: TimeFrame::day(),
            start,
            end,
            asset_class: AssetClass::UsEquity,
            provider_specific: req.provider_params.clone(),
        })
        .await
        .map_err(|source| PipelineError::Bars {
            symbol: req.symbol.clone(),
            source,
        })?;

    let reports = earnings
        .fetch_earnings(EarningsRequestParams {
            symbol: req.symbol.clone(),
            start: req.from,
            end: req.to,
        })
        .await
        .map_err(|source| PipelineError::Earnings {
            symbol: req.symbol.clone(),
            source,
        })?;

    let price_bars = match series
        .iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(&req.symbol))
    {
        Some(s) => normalize::price_bars(&s.bars, settings.timezone),
        None => {
            tracing::warn!(symbol = %req.symbol, "bar provider returned no data");
            Vec::new()
        }
    };
    let events = normalize::earnings_events(&reports);

    let combined = align(&price_bars, &events);
    let run = analyze_run(&combined, settings.days_before, settings.days_after);

    tracing::info!(
        symbol = %req.symbol,
        bars = price_bars.len(),
        anchors = events.len(),
        results = run.results.len(),
        skipped = run.skipped.len(),
        "analysed ticker"
    );

    Ok(TickerAnalysis {
        symbol: req.symbol.clone(),
        combined,
        run,
    })
}
