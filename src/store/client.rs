use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::config::StoreConfig;

use super::error::{RemoteErrorBody, StoreError};
use super::query::{RequestMethod, StoreRequest, TableQuery};

/// Read access to the remote tabular store. Object-safe so handlers and tests
/// can swap the HTTP-backed client for an in-memory one.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Run a row-returning query. Rows come back as raw JSON objects; callers
    /// deserialize into their own row types.
    async fn select(&self, query: TableQuery) -> Result<Vec<Value>, StoreError>;

    /// Run a count-only query (no rows transferred).
    async fn count(&self, query: TableQuery) -> Result<u64, StoreError>;
}

/// PostgREST-backed store client. Stateless aside from the shared HTTP
/// connection pool owned by `reqwest`.
pub struct PostgrestStore {
    http: reqwest::Client,
    rest_base: Url,
    anon_key: String,
}

impl PostgrestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let rest_base = Url::parse(&config.base_url)
            .and_then(|base| base.join("rest/v1/"))
            .map_err(|_| StoreError::InvalidBaseUrl(config.base_url.clone()))?;

        Ok(Self {
            http,
            rest_base,
            anon_key: config.anon_key.clone(),
        })
    }

    async fn execute(&self, request: StoreRequest) -> Result<reqwest::Response, StoreError> {
        let url = self
            .rest_base
            .join(&request.table)
            .map_err(|_| StoreError::InvalidTableName(request.table.clone()))?;

        let method = match request.method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Head => Method::HEAD,
        };

        let mut builder = self
            .http
            .request(method, url)
            .query(&request.query_pairs)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key);

        if let Some(prefer) = &request.prefer {
            builder = builder.header("Prefer", prefer.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Failed queries carry a structured error body; HEAD responses do not.
        let error = match response.json::<RemoteErrorBody>().await {
            Ok(body) => body.into_error(status.as_u16()),
            Err(_) => StoreError::Remote {
                code: status.as_u16().to_string(),
                message: format!("remote store returned {}", status),
                details: None,
            },
        };
        Err(error)
    }
}

#[async_trait]
impl TableStore for PostgrestStore {
    async fn select(&self, query: TableQuery) -> Result<Vec<Value>, StoreError> {
        let response = self.execute(query.to_request()).await?;
        let rows: Vec<Value> = response.json().await?;
        Ok(rows)
    }

    async fn count(&self, query: TableQuery) -> Result<u64, StoreError> {
        let response = self.execute(query.to_request()).await?;
        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                StoreError::BadResponse("count response missing content-range".to_string())
            })?;
        parse_content_range_total(content_range)
    }
}

/// Extract the total from a `Content-Range` value such as `0-5/42` or `*/13`.
fn parse_content_range_total(value: &str) -> Result<u64, StoreError> {
    value
        .rsplit('/')
        .next()
        .and_then(|total| total.parse::<u64>().ok())
        .ok_or_else(|| {
            StoreError::BadResponse(format!("unparseable content-range: {}", value))
        })
}
