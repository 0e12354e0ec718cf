//! Network boundary of the engine.
//!
//! Strategies talk to the network through the `NetworkFetch` trait so tests
//! can script responses and count calls. The real implementation wraps a
//! reqwest client built by `offsync-config`, with exponential-backoff
//! retries applied before a transport failure is declared.

use crate::request::{FetchRequest, FetchResponse};
use async_trait::async_trait;
use derive_builder::Builder;
use offsync_config::http::{
    build_http_client, fetch_url_content, post_json_content, HttpClientParams,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Network unreachable, DNS failure, timed out after retries.
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The HTTP client itself could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

#[async_trait]
pub trait NetworkFetch: Send + Sync {
    /// Perform a GET fetch for an intercepted request. A response with a
    /// non-success status is a valid `Ok` result; only transport-level
    /// failure is an error.
    async fn fetch(&self, request: &FetchRequest)
        -> Result<FetchResponse, FetchError>;

    /// Transmit a JSON body in a single POST (sync batch transmission).
    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<FetchResponse, FetchError>;
}

pub type AbstractFetcher = Arc<dyn NetworkFetch + Send + Sync>;

#[derive(Builder, Clone, Debug)]
#[builder(public, setter(into))]
pub struct HttpFetcherOptions {
    #[builder(default = "30")]
    pub timeout: u64,
    #[builder(default = "10")]
    pub connect_timeout: u64,
    #[builder(default = "String::from(\"offsync/0.2\")")]
    pub user_agent: String,
}

impl Default for HttpFetcherOptions {
    fn default() -> Self {
        Self {
            timeout: 30,
            connect_timeout: 10,
            user_agent: String::from("offsync/0.2"),
        }
    }
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(options: HttpFetcherOptions) -> Result<Self, FetchError> {
        let client = build_http_client(HttpClientParams {
            timeout: options.timeout,
            connect_timeout: options.connect_timeout,
            user_agent: &options.user_agent,
        })
        .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl NetworkFetch for HttpFetcher {
    async fn fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<FetchResponse, FetchError> {
        let (status, headers, body) =
            fetch_url_content(self.client.clone(), request.url.as_str())
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(FetchResponse::network(
            status.as_u16(),
            header_map(&headers),
            body,
        ))
    }

    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<FetchResponse, FetchError> {
        let (status, headers, bytes) =
            post_json_content(self.client.clone(), url.as_str(), body)
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(FetchResponse::network(
            status.as_u16(),
            header_map(&headers),
            bytes,
        ))
    }
}

fn header_map(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
