//! Request/response model at the interception boundary.

use offsync_store::ResponseSnapshot;
use std::collections::HashMap;
use url::Url;

/// What kind of resource a request is navigating to, as reported by the
/// requesting client. Only `Document` influences classification; everything
/// else is treated uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Script,
    Style,
    Font,
    Image,
    #[default]
    Other,
}

/// An intercepted outgoing request, observed before it reaches the network.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Uppercase HTTP method.
    pub method: String,
    /// Absolute request URL.
    pub url: Url,
    /// Requested destination.
    pub destination: Destination,
}

impl FetchRequest {
    pub fn new(method: &str, url: Url, destination: Destination) -> Self {
        Self {
            method: method.to_uppercase(),
            url,
            destination,
        }
    }

    /// A plain GET request (script/style/image/API fetches).
    pub fn get(url: Url) -> Self {
        Self::new("GET", url, Destination::Other)
    }

    /// A GET navigation to a document.
    pub fn document(url: Url) -> Self {
        Self::new("GET", url, Destination::Document)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Cache key for this request. Only GET requests are ever cached, so the
    /// absolute URL (including query) is the whole key.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    Synthesized,
}

/// A response delivered back to the requesting client.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl FetchResponse {
    pub fn network(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            source: ResponseSource::Network,
        }
    }

    /// Replay a stored snapshot.
    pub fn from_snapshot(snapshot: &ResponseSnapshot) -> Self {
        Self {
            status: snapshot.status,
            headers: snapshot.headers.clone(),
            body: snapshot.body.clone(),
            source: ResponseSource::Cache,
        }
    }

    /// Snapshot this response for storage.
    pub fn to_snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot::new(self.status, self.headers.clone(), self.body.clone())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is_normalized() {
        let url = Url::parse("http://localhost:5000/api/categories").unwrap();
        let request = FetchRequest::new("get", url, Destination::Other);
        assert!(request.is_get());
    }

    #[test]
    fn test_cache_key_includes_query() {
        let url = Url::parse("http://localhost:5000/api/daily_words?day=1").unwrap();
        let request = FetchRequest::get(url);
        assert_eq!(
            request.cache_key(),
            "http://localhost:5000/api/daily_words?day=1"
        );
    }

    #[test]
    fn test_snapshot_roundtrip_is_byte_identical() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/css".to_string());
        let response =
            FetchResponse::network(200, headers, b"body { margin: 0 }".to_vec());

        let replayed = FetchResponse::from_snapshot(&response.to_snapshot());
        assert_eq!(replayed.status, response.status);
        assert_eq!(replayed.headers, response.headers);
        assert_eq!(replayed.body, response.body);
        assert_eq!(replayed.source, ResponseSource::Cache);
    }
}
