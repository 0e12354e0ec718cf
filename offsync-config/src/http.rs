//! HTTP client module for the network side of the engine.
//!
//! This module provides functionality for building and configuring the HTTP
//! client the engine fetches through, with:
//! - Timeout settings
//! - User agent customization
//! - Retry mechanisms with exponential backoff
//!
//! # Example
//! ```no_run
//! use offsync_config::http::{HttpClientParams, build_http_client};
//! use serde_yaml::Value;
//!
//! let config: Value = serde_yaml::from_str(r#"
//! http:
//!     timeout: 30
//!     connect_timeout: 10
//! "#).unwrap();
//!
//! let params = HttpClientParams::from_config(&config["http"], "offsync/0.2");
//! let client = build_http_client(params).unwrap();
//! ```
use backoff::ExponentialBackoffBuilder;

/// Parameters for configuring an HTTP client.
#[derive(Debug)]
pub struct HttpClientParams<'a> {
    pub timeout: u64,
    pub connect_timeout: u64,
    pub user_agent: &'a str,
}

impl<'a> HttpClientParams<'a> {
    /// Creates an HttpClientParams instance from a YAML configuration.
    ///
    /// The configuration should follow this structure:
    /// ```yaml
    /// http:
    ///     timeout: 30
    ///     connect_timeout: 10
    /// ```
    ///
    /// # Panics
    /// Panics if required configuration fields are missing (timeout, connect_timeout)
    pub fn from_config(
        http_config: &serde_yaml::Value,
        user_agent: &'a str,
    ) -> Self {
        let timeout = http_config["timeout"]
            .as_u64()
            .expect("No timeout field in config");
        let connect_timeout = http_config["connect_timeout"]
            .as_u64()
            .expect("No connect_timeout field in config");

        Self {
            timeout,
            connect_timeout,
            user_agent,
        }
    }
}

/// Builds an HTTP client with the specified parameters.
///
/// Creates a reqwest::Client configured with TLS, timeouts and user agent.
pub fn build_http_client(
    params: HttpClientParams,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .use_rustls_tls()
        .timeout(std::time::Duration::from_secs(params.timeout))
        .connect_timeout(std::time::Duration::from_secs(params.connect_timeout))
        .user_agent(params.user_agent)
        .build()
}

/// Fetches a URL with automatic retries.
///
/// Makes a GET request to the specified URL, automatically retrying on
/// transport failure using exponential backoff. This method only retrieves
/// headers and status, not the response body. A response with a non-success
/// status is still an `Ok` result; only transport-level failures are retried.
pub async fn fetch_url(
    client: reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    let backoff = ExponentialBackoffBuilder::new()
        .with_max_interval(std::time::Duration::from_secs(10))
        .with_max_elapsed_time(Some(std::time::Duration::from_secs(30)))
        .build();
    backoff::future::retry(backoff, || async { Ok(client.get(url).send().await?) })
        .await
}

/// Fetches content from a URL with automatic retries.
///
/// Makes a GET request to the specified URL and retrieves status, headers and
/// the full response body, automatically retrying transport failures using
/// exponential backoff.
pub async fn fetch_url_content(
    client: reqwest::Client,
    url: &str,
) -> Result<(reqwest::StatusCode, reqwest::header::HeaderMap, Vec<u8>), reqwest::Error>
{
    let backoff = ExponentialBackoffBuilder::new()
        .with_max_interval(std::time::Duration::from_secs(10))
        .with_max_elapsed_time(Some(std::time::Duration::from_secs(30)))
        .build();

    let fetch_content = || async {
        let response = client.get(url).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok((status, headers, body))
    };

    backoff::future::retry(backoff, fetch_content).await
}

/// Posts a JSON body to a URL with automatic retries.
///
/// Used by the sync drain to transmit a whole batch in one request.
pub async fn post_json_content(
    client: reqwest::Client,
    url: &str,
    body: &serde_json::Value,
) -> Result<(reqwest::StatusCode, reqwest::header::HeaderMap, Vec<u8>), reqwest::Error>
{
    let backoff = ExponentialBackoffBuilder::new()
        .with_max_interval(std::time::Duration::from_secs(10))
        .with_max_elapsed_time(Some(std::time::Duration::from_secs(30)))
        .build();

    let post_content = || async {
        let response = client.post(url).json(body).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?.to_vec();
        Ok((status, headers, bytes))
    };

    backoff::future::retry(backoff, post_content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use std::time::Duration;

    const YAML_CONF_TEXT: &str = r#"
    http:
      timeout: 30
      connect_timeout: 10
    "#;

    const WRONG_YAML_CONF_TEXT: &str = r#"
    http:
      connect_timeout: 10
    "#;

    #[test]
    fn test_build_client() {
        let client = build_http_client(HttpClientParams {
            timeout: 10,
            connect_timeout: 5,
            user_agent: "hello",
        });

        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_from_config() {
        let config: serde_yaml::Value =
            serde_yaml::from_str(YAML_CONF_TEXT).unwrap();
        let client = build_http_client(HttpClientParams::from_config(
            config.get("http").unwrap(),
            "offsync/0.2",
        ));
        assert!(client.is_ok());
    }

    #[test]
    #[should_panic(expected = "No timeout field in config")]
    fn test_build_client_bad_config() {
        let config: serde_yaml::Value =
            serde_yaml::from_str(WRONG_YAML_CONF_TEXT).unwrap();
        let _ = build_http_client(HttpClientParams::from_config(
            config.get("http").unwrap(),
            "offsync/0.2",
        ));
    }

    #[test]
    fn test_http_client_params_timeouts_are_set() {
        let config: Value = serde_yaml::from_str(YAML_CONF_TEXT).unwrap();
        let client_params =
            HttpClientParams::from_config(&config["http"], "test-agent/1.0");

        assert_eq!(client_params.timeout, Duration::from_secs(30).as_secs());
        assert_eq!(
            client_params.connect_timeout,
            Duration::from_secs(10).as_secs()
        );
    }
}
