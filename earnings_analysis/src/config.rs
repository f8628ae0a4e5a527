//! Analysis configuration: parsing, normalization, and loading.
//!
//! The TOML file has three optional tables:
//!
//! ```toml
//! [analysis]
//! days_before = 5
//! days_after = 20
//! timezone = "America/New_York"
//!
//! [bars]
//! provider = "alpaca"
//! feed = "iex"
//! adjustment = "all"
//!
//! [earnings]
//! provider = "alpha_vantage"
//! requests_per_minute = 5
//! ```
//!
//! Every key has a default, so an empty file is a valid configuration.
//! Credentials are never read from the file; providers take them from the
//! environment.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]

use anyhow::{Context, bail};
use market_data_ingestor::providers::{
    alpaca_rest::{Adjustment, Feed},
    alpha_vantage::DEFAULT_REQUESTS_PER_MINUTE,
};
use serde::{Deserialize, Serialize};

use crate::{
    pipeline::AnalysisSettings,
    providers::{BarsProviderId, EarningsProviderId},
    tz::{DEFAULT_EXCHANGE_TZ, resolve_tz},
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Window and calendar settings.
    #[serde(default)]
    pub analysis: AnalysisCfg,
    /// Bar source settings.
    #[serde(default)]
    pub bars: BarsCfg,
    /// Earnings source settings.
    #[serde(default)]
    pub earnings: EarningsCfg,
}

/// `[analysis]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AnalysisCfg {
    /// Calendar days before each anchor.
    pub days_before: u32,
    /// Calendar days after each anchor.
    pub days_after: u32,
    /// IANA name of the exchange time zone.
    pub timezone: String,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self {
            days_before: 5,
            days_after: 20,
            timezone: DEFAULT_EXCHANGE_TZ.to_string(),
        }
    }
}

/// `[bars]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct BarsCfg {
    /// Provider code, normalized to lowercase.
    pub provider: String,
    /// Source feed; the vendor default when absent.
    pub feed: Option<Feed>,
    /// Corporate-action adjustment.
    pub adjustment: Adjustment,
}

impl Default for BarsCfg {
    fn default() -> Self {
        Self {
            provider: BarsProviderId::Alpaca.code().to_string(),
            feed: None,
            adjustment: Adjustment::All,
        }
    }
}

/// `[earnings]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct EarningsCfg {
    /// Provider code, normalized to lowercase.
    pub provider: String,
    /// Request quota enforced client-side.
    pub requests_per_minute: u32,
}

impl Default for EarningsCfg {
    fn default() -> Self {
        Self {
            provider: EarningsProviderId::AlphaVantage.code().to_string(),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

/// Normalize a configuration in place and reject invalid values.
///
/// What normalization does:
/// - Trim + lowercase provider codes and check they name a known provider
/// - Trim the time zone name and check it parses as an IANA zone
/// - Require a positive earnings request quota
pub fn normalize_config(cfg: &mut AppConfig) -> anyhow::Result<()> {
    cfg.bars.provider = cfg.bars.provider.trim().to_lowercase();
    BarsProviderId::from_code(&cfg.bars.provider)
        .with_context(|| format!("unknown bars provider: {}", cfg.bars.provider))?;

    cfg.earnings.provider = cfg.earnings.provider.trim().to_lowercase();
    let id = EarningsProviderId::from_code(&cfg.earnings.provider)
        .with_context(|| format!("unknown earnings provider: {}", cfg.earnings.provider))?;
    cfg.earnings.provider = id.code().to_string();

    if cfg.earnings.requests_per_minute == 0 {
        bail!("earnings.requests_per_minute must be at least 1");
    }

    cfg.analysis.timezone = cfg.analysis.timezone.trim().to_string();
    resolve_tz(&cfg.analysis.timezone)?;
    Ok(())
}

impl AppConfig {
    /// Resolved window and time zone for the pipeline.
    pub fn analysis_settings(&self) -> anyhow::Result<AnalysisSettings> {
        Ok(AnalysisSettings {
            days_before: self.analysis.days_before,
            days_after: self.analysis.days_after,
            timezone: resolve_tz(&self.analysis.timezone)?,
        })
    }
}

/// Parse and normalize a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AppConfig> {
    let mut cfg: AppConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
    normalize_config(&mut cfg).context("invalid config")?;
    Ok(cfg)
}

/// Read a configuration TOML file from disk, parse, and normalize it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
