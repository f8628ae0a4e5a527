//! Provider registry that maps configured provider codes to concrete providers.

use market_data_ingestor::{
    models::request_params::ProviderParams,
    providers::{
        DataProvider, EarningsProvider, ProviderInitError,
        alpaca_rest::{AlpacaBarsParams, AlpacaProvider},
        alpha_vantage::AlphaVantageProvider,
    },
};

use crate::config::{BarsCfg, EarningsCfg};

/// Known bar sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarsProviderId {
    /// Alpaca market data v2.
    Alpaca,
}

impl BarsProviderId {
    /// Canonical lowercase code used in configuration.
    pub const fn code(&self) -> &'static str {
        match self {
            BarsProviderId::Alpaca => "alpaca",
        }
    }

    /// Look up a normalized code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "alpaca" => Some(BarsProviderId::Alpaca),
            _ => None,
        }
    }
}

/// Known earnings-calendar sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarningsProviderId {
    /// Alpha Vantage `EARNINGS` function.
    AlphaVantage,
}

impl EarningsProviderId {
    /// Canonical lowercase code used in configuration.
    pub const fn code(&self) -> &'static str {
        match self {
            EarningsProviderId::AlphaVantage => "alpha_vantage",
        }
    }

    /// Look up a normalized code; `alphavantage` is accepted as an alias.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "alpha_vantage" | "alphavantage" => Some(EarningsProviderId::AlphaVantage),
            _ => None,
        }
    }
}

/// Build the bar provider named in `cfg`. Credentials come from the environment.
pub fn build_bars_provider(cfg: &BarsCfg) -> anyhow::Result<Box<dyn DataProvider>> {
    match BarsProviderId::from_code(&cfg.provider) {
        Some(BarsProviderId::Alpaca) => Ok(Box::new(AlpacaProvider::new().map_err(init_err)?)),
        None => anyhow::bail!("unknown bars provider: {}", cfg.provider),
    }
}

/// Build the earnings provider named in `cfg`. Credentials come from the environment.
pub fn build_earnings_provider(cfg: &EarningsCfg) -> anyhow::Result<Box<dyn EarningsProvider>> {
    match EarningsProviderId::from_code(&cfg.provider) {
        Some(EarningsProviderId::AlphaVantage) => Ok(Box::new(
            AlphaVantageProvider::new(cfg.requests_per_minute).map_err(init_err)?,
        )),
        None => anyhow::bail!("unknown earnings provider: {}", cfg.provider),
    }
}

/// Per-request options for the configured bar provider.
pub fn bars_request_options(cfg: &BarsCfg) -> ProviderParams {
    match BarsProviderId::from_code(&cfg.provider) {
        Some(BarsProviderId::Alpaca) => ProviderParams::Alpaca(AlpacaBarsParams {
            adjustment: Some(cfg.adjustment),
            feed: cfg.feed,
            ..Default::default()
        }),
        None => ProviderParams::None,
    }
}

fn init_err(e: ProviderInitError) -> anyhow::Error {
    anyhow::Error::new(e).context("provider initialization failed")
}
