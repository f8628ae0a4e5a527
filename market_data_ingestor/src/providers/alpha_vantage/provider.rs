use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::{OptionExt, ResultExt};

use crate::{
    models::{earnings::EarningsReport, request_params::EarningsRequestParams},
    providers::{
        alpha_vantage::response::EarningsResponse, ApiSnafu, ClientBuildSnafu, DecodeSnafu,
        EarningsProvider, MissingEnvVarSnafu, ProviderError, ProviderInitError, ReqwestSnafu,
        ValidationSnafu, ZeroRateLimitSnafu,
    },
};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Free-tier quota.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 5;

pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    limiter: DefaultDirectRateLimiter,
}

impl AlphaVantageProvider {
    /// Creates a provider reading the key from `ALPHAVANTAGE_API_KEY`.
    pub fn new(requests_per_minute: u32) -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(
            get_env_var("ALPHAVANTAGE_API_KEY")
                .context(MissingEnvVarSnafu)?
                .into(),
        );
        Self::with_credentials(api_key, BASE_URL, requests_per_minute)
    }

    /// Creates a provider with an explicit key, endpoint and quota.
    ///
    /// Requests are paced evenly across the minute rather than allowed to burst.
    pub fn with_credentials(
        api_key: SecretString,
        base_url: impl Into<String>,
        requests_per_minute: u32,
    ) -> Result<Self, ProviderInitError> {
        let per_minute = NonZeroU32::new(requests_per_minute).context(ZeroRateLimitSnafu)?;
        let client = Client::builder().build().context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute).allow_burst(nonzero!(1u32))),
        })
    }
}

#[async_trait]
impl EarningsProvider for AlphaVantageProvider {
    async fn fetch_earnings(
        &self,
        params: EarningsRequestParams,
    ) -> Result<Vec<EarningsReport>, ProviderError> {
        if params.symbol.trim().is_empty() {
            return ValidationSnafu { message: "empty symbol" }.fail();
        }
        if params.start > params.end {
            return ValidationSnafu {
                message: format!("start {} is after end {}", params.start, params.end),
            }
            .fail();
        }

        self.limiter.until_ready().await;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "EARNINGS"),
                ("symbol", params.symbol.as_str()),
                ("apikey", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;
        if !status.is_success() {
            return ApiSnafu {
                message: format!("{status}: {body}"),
            }
            .fail();
        }

        let decoded: EarningsResponse = serde_json::from_str(&body).context(DecodeSnafu)?;
        let reports = decoded.into_reports(&params)?;

        tracing::info!(
            symbol = %params.symbol,
            start = %params.start,
            end = %params.end,
            reports = reports.len(),
            "fetched earnings from alpha vantage"
        );

        Ok(reports)
    }
}
