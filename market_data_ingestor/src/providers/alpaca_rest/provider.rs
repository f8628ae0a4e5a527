use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;

use crate::{
    models::{asset::AssetClass, bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        alpaca_rest::{
            params::{construct_params, validate_timeframe},
            response::{AlpacaBar, AlpacaErrorBody, AlpacaResponse},
        },
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, MissingEnvVarSnafu,
        ProviderError, ProviderInitError, ReqwestSnafu, ValidationSnafu,
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    _api_key: SecretString,
    _secret_key: SecretString,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(
            get_env_var("APCA_API_KEY_ID")
                .context(MissingEnvVarSnafu)?
                .into(),
        );
        let secret_key = SecretString::new(
            get_env_var("APCA_API_SECRET_KEY")
                .context(MissingEnvVarSnafu)?
                .into(),
        );
        Self::with_credentials(api_key, secret_key, BASE_URL)
    }

    /// Creates a provider with explicit credentials and endpoint.
    pub fn with_credentials(
        api_key: SecretString,
        secret_key: SecretString,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            _api_key: api_key,
            _secret_key: secret_key,
        })
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        validate_timeframe(&params.timeframe)?;
        if params.asset_class != AssetClass::UsEquity {
            return ValidationSnafu {
                message: format!(
                    "asset class {} is not served by the stock bars endpoint",
                    params.asset_class
                ),
            }
            .fail();
        }
        if params.symbols.is_empty() {
            return ValidationSnafu { message: "no symbols requested" }.fail();
        }

        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query_params = construct_params(&params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            let response = self
                .client
                .get(&self.base_url)
                .query(&query_params)
                .send()
                .await
                .context(ReqwestSnafu)?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                let message = serde_json::from_str::<AlpacaErrorBody>(&body)
                    .map(|b| b.message)
                    .unwrap_or(body);
                return ApiSnafu { message: format!("{status}: {message}") }.fail();
            }

            let alpaca_response = response.json::<AlpacaResponse>().await.context(ReqwestSnafu)?;
            pages += 1;

            // Merge the bars from the current page into our collection.
            for (symbol, bars) in alpaca_response.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match alpaca_response.next_page_token {
                Some(token) => {
                    tracing::debug!(page = pages, "alpaca bars: following next_page_token");
                    next_page_token = Some(token);
                }
                None => break,
            }
        }

        tracing::info!(
            symbols = %params.symbols.join(","),
            timeframe = %params.timeframe,
            pages,
            bars = all_bars.values().map(Vec::len).sum::<usize>(),
            "fetched bars from alpaca"
        );

        let result = all_bars
            .into_iter()
            .map(|(symbol, alpaca_bars)| {
                let mut series = BarSeries {
                    symbol,
                    timeframe: params.timeframe.clone(),
                    bars: alpaca_bars.into_iter().map(Bar::from).collect(),
                };
                series.sort_ascending();
                series
            })
            .collect();

        Ok(result)
    }
}
