//! Provider abstraction for market data sources.
//!
//! This module defines two traits that serve as the unified interface to
//! market data vendors:
//!
//! - [`DataProvider`] fetches time-series bar data (implemented by
//!   [`alpaca_rest::AlpacaProvider`]).
//! - [`EarningsProvider`] fetches quarterly earnings announcements
//!   (implemented by [`alpha_vantage::AlphaVantageProvider`]).
//!
//! Both traits are async and object safe, so callers can hold a
//! `Box<dyn DataProvider>` chosen at runtime and swap in an in-memory fake in tests.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar_series::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: BarsRequestParams,
//!     ) -> Result<Vec<BarSeries>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod alpha_vantage;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{
    bar_series::BarSeries,
    earnings::EarningsReport,
    request_params::{BarsRequestParams, EarningsRequestParams},
};

/// Trait for fetching time-series bar data from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches time-series bar data for the given request parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BarSeries>)` - One series per symbol that had data, bars ascending.
    /// * `Err(ProviderError)` - Transport, vendor or validation failure.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError>;
}

/// Trait for fetching earnings announcements from an earnings-calendar provider.
#[async_trait]
pub trait EarningsProvider: Send + Sync {
    /// Fetches the earnings reports announced within `params.start..=params.end`,
    /// ascending by announcement date.
    async fn fetch_earnings(
        &self,
        params: EarningsRequestParams,
    ) -> Result<Vec<EarningsReport>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// A configured rate limit of zero requests.
    #[snafu(display("Rate limit must allow at least one request per minute"))]
    ZeroRateLimit { backtrace: Backtrace },
}

/// Errors that can occur within a provider implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., invalid API key).
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded into the vendor schema.
    #[snafu(display("Failed to decode response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::{
        asset::AssetClass,
        request_params::ProviderParams,
        timeframe::TimeFrame,
    };

    struct EmptyBars;
    struct FixedEarnings;

    #[async_trait]
    impl DataProvider for EmptyBars {
        async fn fetch_bars(
            &self,
            _params: BarsRequestParams,
        ) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl EarningsProvider for FixedEarnings {
        async fn fetch_earnings(
            &self,
            params: EarningsRequestParams,
        ) -> Result<Vec<EarningsReport>, ProviderError> {
            Ok(vec![EarningsReport {
                symbol: params.symbol,
                fiscal_date_ending: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                reported_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                report_time: None,
                reported_eps: Some(1.53),
                estimated_eps: Some(1.5),
                surprise: Some(0.03),
                surprise_pct: Some(2.0),
            }])
        }
    }

    // Runtime selection only works through `Box<dyn ...>`.
    fn boxed_providers() -> (Box<dyn DataProvider>, Box<dyn EarningsProvider>) {
        (Box::new(EmptyBars), Box::new(FixedEarnings))
    }

    #[tokio::test]
    async fn providers_are_object_safe() {
        let (bars, earnings) = boxed_providers();

        let params = BarsRequestParams {
            symbols: vec!["AAPL".to_string()],
            timeframe: TimeFrame::day(),
            start: Utc::now(),
            end: Utc::now(),
            asset_class: AssetClass::UsEquity,
            provider_specific: ProviderParams::None,
        };
        assert!(bars.fetch_bars(params).await.unwrap().is_empty());

        let reports = earnings
            .fetch_earnings(EarningsRequestParams {
                symbol: "AAPL".into(),
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].symbol, "AAPL");
    }

    #[test]
    fn api_error_display_carries_message() {
        let err = ApiSnafu { message: "forbidden" }.build();
        assert_eq!(err.to_string(), "API error: forbidden");
    }
}
