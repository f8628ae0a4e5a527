//! Error types of the analysis core and the fetch pipeline.

use chrono::NaiveDate;
use market_data_ingestor::providers::ProviderError;
use thiserror::Error;

/// Why a single earnings anchor could not be evaluated.
///
/// These are never fatal to a run; the aggregator records them and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No record falls inside the window.
    #[error("window around {anchor} is empty")]
    EmptyWindow {
        /// The anchor date.
        anchor: NaiveDate,
    },

    /// No record with a finite close exists at the anchor date.
    #[error("no close price on anchor date {anchor}")]
    MissingAnchorPrice {
        /// The anchor date.
        anchor: NaiveDate,
    },

    /// The anchor close is zero.
    #[error("anchor close on {anchor} is zero")]
    DivisionByZero {
        /// The anchor date.
        anchor: NaiveDate,
    },
}

impl AnalysisError {
    /// The anchor date the error refers to.
    pub fn anchor(&self) -> NaiveDate {
        match self {
            AnalysisError::EmptyWindow { anchor }
            | AnalysisError::MissingAnchorPrice { anchor }
            | AnalysisError::DivisionByZero { anchor } => *anchor,
        }
    }
}

/// Failures of [`analyze_ticker`](crate::pipeline::analyze_ticker).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The requested date range is inverted.
    #[error("invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Requested first date.
        from: NaiveDate,
        /// Requested last date.
        to: NaiveDate,
    },

    /// The requested range could not be expressed in the exchange time zone.
    #[error("calendar conversion failed: {0}")]
    Calendar(#[source] anyhow::Error),

    /// The bar provider failed.
    #[error("failed to fetch bars for {symbol}: {source}")]
    Bars {
        /// Ticker being fetched.
        symbol: String,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },

    /// The earnings provider failed.
    #[error("failed to fetch earnings for {symbol}: {source}")]
    Earnings {
        /// Ticker being fetched.
        symbol: String,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },
}
