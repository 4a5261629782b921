pub(crate) mod games;
mod image;
pub(crate) mod members;
#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod queries;

pub use image::{ImageUrlBuilder, PLACEHOLDER_AVATAR, PLACEHOLDER_COVER};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CmsError, Result};

/// Named parameters bound into a query (`$slug` and friends).
pub type QueryParams<'a> = &'a [(&'a str, Value)];

/// Anything that can answer a CMS query with a JSON result.
///
/// The production implementation is [`SanityHttpSource`]; tests use an
/// in-memory document store.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run `query` with `params` and return the `result` value.
    ///
    /// A point query that matches nothing yields [`Value::Null`].
    async fn query(&self, query: &str, params: QueryParams<'_>) -> Result<Value>;
}

/// Connection settings for the content source.
#[derive(Debug, Clone)]
pub struct CmsSettings {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
}

impl Default for CmsSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
        }
    }
}

/// Queries a Sanity-compatible HTTP query endpoint.
pub struct SanityHttpSource {
    http: reqwest::Client,
    settings: CmsSettings,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

impl SanityHttpSource {
    pub fn new(settings: CmsSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Use the provided [`reqwest::Client`], e.g. one with a timeout configured.
    pub fn with_client(http: reqwest::Client, settings: CmsSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &CmsSettings {
        &self.settings
    }

    fn query_url(&self, query: &str, params: QueryParams<'_>) -> Result<reqwest::Url> {
        let settings = &self.settings;
        if settings.project_id.is_empty() {
            return Err(CmsError::Config("missing project id".to_string()));
        }
        let host = if settings.use_cdn { "apicdn" } else { "api" };
        let base = format!(
            "https://{}.{host}.sanity.io/v{}/data/query/{}",
            settings.project_id, settings.api_version, settings.dataset
        );

        let mut pairs = vec![("query".to_string(), query.to_string())];
        pairs.extend(
            params
                .iter()
                .map(|(name, value)| (format!("${name}"), value.to_string())),
        );

        reqwest::Url::parse_with_params(&base, &pairs)
            .map_err(|e| CmsError::Config(format!("invalid query url {base}: {e}")))
    }
}

#[async_trait]
impl ContentSource for SanityHttpSource {
    async fn query(&self, query: &str, params: QueryParams<'_>) -> Result<Value> {
        let url = self.query_url(query, params)?;
        let body = get_text(&self.http, url.as_str()).await?;
        let response: QueryResponse =
            serde_json::from_str(&body).map_err(|source| CmsError::Decode {
                context: "query response",
                source,
            })?;
        Ok(response.result)
    }
}

/// Fetch a URL and return the response body as text.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "querying content source");

    let response = client.get(url).send().await.map_err(|e| CmsError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CmsError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| CmsError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Decode a query result into the raw document type.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, context: &'static str) -> Result<T> {
    serde_json::from_value(value).map_err(|source| CmsError::Decode { context, source })
}

/// Decode a point-query result, mapping `null` to `None`.
pub(crate) fn decode_optional<T: DeserializeOwned>(
    value: Value,
    context: &'static str,
) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    decode(value, context).map(Some)
}
