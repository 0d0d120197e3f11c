//! HTTP client for the HotPepper Gourmet API.
//!
//! Wraps `reqwest` with API key injection, per-request timeouts, linear
//! retry on transient failures and typed `results` deserialization. Every
//! public operation returns an [`ApiResult`] so callers never see transport
//! errors directly.

use std::fmt;
use std::time::{Duration, Instant};

use gourmet_core::config::DEFAULT_HOTPEPPER_BASE_URL;
use gourmet_core::{ApiResult, AppConfig};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{config_error, HotpepperError};
use crate::params::{QueryPairs, QueryValue, ShopSearchParams};
use crate::retry::retry_with_backoff;
use crate::types::{
    GenreResults, LargeAreaResults, MiddleAreaResults, ResultSet, ShopResults, SmallAreaResults,
    UpstreamErrorEntry,
};

const MASKED_KEY: &str = "***";

/// Directory endpoints, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Gourmet,
    Genre,
    LargeArea,
    MiddleArea,
    SmallArea,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Gourmet => "gourmet/v1/",
            Self::Genre => "genre/v1/",
            Self::LargeArea => "large_area/v1/",
            Self::MiddleArea => "middle_area/v1/",
            Self::SmallArea => "small_area/v1/",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Tunables for [`HotpepperClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HOTPEPPER_BASE_URL.to_owned(),
            timeout: Duration::from_millis(7_000),
            max_retries: 1,
            retry_delay: Duration::from_millis(250),
            user_agent: "gourmet-bff/0.1".to_owned(),
        }
    }
}

impl From<&AppConfig> for ClientOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.hotpepper_base_url.clone(),
            timeout: Duration::from_millis(config.hotpepper_timeout_ms),
            max_retries: config.hotpepper_max_retries,
            retry_delay: Duration::from_millis(config.hotpepper_retry_delay_ms),
            user_agent: config.hotpepper_user_agent.clone(),
        }
    }
}

/// Client for the HotPepper Gourmet API.
///
/// Cheap to clone; clones share the connection pool. A client built without
/// an API key still constructs, but every call fails with `CONFIG_ERROR`
/// before touching the network.
#[derive(Clone)]
pub struct HotpepperClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl HotpepperClient {
    /// # Errors
    ///
    /// Returns [`HotpepperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`HotpepperError::InvalidBaseUrl`] if the
    /// base URL does not parse.
    pub fn new(api_key: Option<&str>, options: &ClientOptions) -> Result<Self, HotpepperError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.timeout.min(Duration::from_secs(10)))
            .user_agent(options.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash, so endpoint paths join under the base
        // rather than replacing its last segment.
        let normalised = format!("{}/", options.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| HotpepperError::InvalidBaseUrl {
            url: options.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(ToOwned::to_owned),
            base_url,
            max_retries: options.max_retries,
            retry_delay: options.retry_delay,
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`HotpepperClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, HotpepperError> {
        Self::new(
            config.hotpepper_api_key.as_deref(),
            &ClientOptions::from(config),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Searches shops on the gourmet endpoint.
    pub async fn search_shops(&self, params: &ShopSearchParams) -> ApiResult<ShopResults> {
        self.request(Endpoint::Gourmet, &params.to_query()).await
    }

    /// Looks up one shop by id. A miss is a success with an empty `shop` list.
    pub async fn get_shop_detail(&self, id: &str) -> ApiResult<ShopResults> {
        self.search_shops(&ShopSearchParams::by_id(id)).await
    }

    pub async fn get_genres(&self) -> ApiResult<GenreResults> {
        self.request(Endpoint::Genre, &QueryPairs::new()).await
    }

    pub async fn get_large_areas(&self) -> ApiResult<LargeAreaResults> {
        self.request(Endpoint::LargeArea, &QueryPairs::new()).await
    }

    pub async fn get_middle_areas(&self, large_area: Option<&str>) -> ApiResult<MiddleAreaResults> {
        let params = vec![("large_area", large_area.map(QueryValue::from))];
        self.request(Endpoint::MiddleArea, &params).await
    }

    pub async fn get_small_areas(&self, middle_area: Option<&str>) -> ApiResult<SmallAreaResults> {
        let params = vec![("middle_area", middle_area.map(QueryValue::from))];
        self.request(Endpoint::SmallArea, &params).await
    }

    async fn request<T>(&self, endpoint: Endpoint, params: &QueryPairs) -> ApiResult<T>
    where
        T: DeserializeOwned + ResultSet,
    {
        let Some(api_key) = self.api_key.as_deref() else {
            let error = config_error();
            tracing::error!(
                category = "API",
                %endpoint,
                code = %error.code,
                "HotPepper API key is missing"
            );
            return ApiResult::failure(error);
        };

        let url = self.build_url(endpoint, api_key, params);
        let logged_url = redact_url(&url);
        tracing::debug!(category = "API", %endpoint, url = %logged_url, "HotPepper request started");

        let started = Instant::now();
        let outcome = retry_with_backoff(self.max_retries, self.retry_delay, |attempt| {
            self.fetch::<T>(endpoint, &url, attempt)
        })
        .await;
        let duration_ms = elapsed_ms(started);

        match outcome {
            Ok(results) => {
                let meta = results.meta();
                tracing::info!(
                    category = "API",
                    %endpoint,
                    duration_ms,
                    available = meta.results_available,
                    returned = meta.results_returned,
                    start = meta.results_start,
                    "HotPepper request succeeded"
                );
                ApiResult::success(results)
            }
            Err(err) => {
                let error = err.into_api_error();
                tracing::error!(
                    category = "API",
                    %endpoint,
                    url = %logged_url,
                    duration_ms,
                    code = %error.code,
                    status = ?error.status_code,
                    cause = error.cause.as_deref().unwrap_or_default(),
                    "HotPepper request failed"
                );
                ApiResult::failure(error)
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &Url,
        attempt: u32,
    ) -> Result<T, HotpepperError> {
        let started = Instant::now();
        // Strip the URL from transport errors: it carries the API key.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| HotpepperError::Http(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HotpepperError::Http(e.without_url()))?;

        tracing::debug!(
            category = "API",
            %endpoint,
            status = status.as_u16(),
            attempt,
            duration_ms = elapsed_ms(started),
            "HotPepper response received"
        );

        if !status.is_success() {
            return Err(HotpepperError::Status {
                status: status.as_u16(),
                body,
                url: redact_url(url),
            });
        }
        parse_results(endpoint, &body)
    }

    /// Builds the request URL: `format=json` and `key` first, then every
    /// present parameter in order.
    fn build_url(&self, endpoint: Endpoint, api_key: &str, params: &QueryPairs) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{}", url.path(), endpoint.path()));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("key", api_key);
            for (name, value) in params {
                if let Some(value) = value {
                    pairs.append_pair(name, &value.to_string());
                }
            }
        }
        url
    }
}

/// Unwraps the `{"results": ...}` envelope and deserializes its contents.
fn parse_results<T: DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T, HotpepperError> {
    let mut envelope: Value =
        serde_json::from_str(body).map_err(|e| HotpepperError::Envelope {
            endpoint: endpoint.path(),
            reason: format!("body is not valid JSON: {e}"),
        })?;

    let results = match envelope.get_mut("results").map(Value::take) {
        Some(results @ Value::Object(_)) => results,
        _ => {
            return Err(HotpepperError::Envelope {
                endpoint: endpoint.path(),
                reason: "missing results object".to_owned(),
            })
        }
    };

    if let Some(errors) = results.get("error") {
        let entries: Vec<UpstreamErrorEntry> = match errors {
            Value::Array(_) => serde_json::from_value(errors.clone()).unwrap_or_default(),
            single => serde_json::from_value(single.clone())
                .map(|entry| vec![entry])
                .unwrap_or_default(),
        };
        let message = entries
            .iter()
            .map(|entry| match (&entry.code, &entry.message) {
                (Some(code), Some(message)) => format!("{message} (code {code})"),
                (None, Some(message)) => message.clone(),
                (Some(code), None) => format!("code {code}"),
                (None, None) => String::new(),
            })
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(HotpepperError::Rejected {
            message: if message.is_empty() {
                "unknown error".to_owned()
            } else {
                message
            },
        });
    }

    serde_json::from_value(results).map_err(|source| HotpepperError::Deserialize {
        context: endpoint.path().to_owned(),
        source,
    })
}

/// Renders `url` with the `key` parameter masked, for logs and error details.
pub(crate) fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" {
                MASKED_KEY.to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
