//! Offline fallback synthesis.
//!
//! When both cache and network fail, the synthesizer produces the response
//! the client degrades on: the pre-cached offline document for navigations,
//! or a structured 503 JSON stub for API calls. The stub shape is
//! path-specific so the client can keep rendering without branching on
//! error text. Static assets get no synthesis; the transport failure
//! propagates.

use crate::classify::ResourceClass;
use crate::request::{FetchRequest, FetchResponse, ResponseSource};
use offsync_store::{CacheStore, StoreError};
use serde_json::json;
use std::collections::HashMap;
use url::Url;

/// Category list served by the offline stub for `/api/categories`. Matches
/// the base category set of the live API so offline rendering stays usable.
pub const OFFLINE_CATEGORIES: [&str; 12] = [
    "작물재배",
    "축산업",
    "농기계",
    "토양관리",
    "비료",
    "병해충방제",
    "수확후처리",
    "저장기술",
    "가공기술",
    "유통",
    "농업정책",
    "농업경영",
];

const OFFLINE_MESSAGE: &str = "오프라인 상태입니다. 네트워크 연결을 확인해주세요.";

/// Synthesizes fallback responses, keyed by resource class.
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    /// Absolute URL of the pre-cached offline document.
    offline_document: Url,
}

impl FallbackSynthesizer {
    pub fn new(offline_document: Url) -> Self {
        Self { offline_document }
    }

    /// Produce a fallback for a failed request, or `None` when nothing can
    /// be synthesized for this class and the failure must propagate.
    pub async fn synthesize(
        &self,
        store: &dyn CacheStore,
        static_namespace: &str,
        class: ResourceClass,
        request: &FetchRequest,
    ) -> Result<Option<FetchResponse>, StoreError> {
        match class {
            ResourceClass::Document => Ok(store
                .get(static_namespace, self.offline_document.as_str())
                .await?
                .map(|snapshot| FetchResponse::from_snapshot(&snapshot))),
            ResourceClass::StaticAsset => Ok(None),
            ResourceClass::ApiBypass | ResourceClass::ApiCacheable => {
                Ok(Some(offline_stub(&request.url)))
            }
        }
    }
}

/// Build the 503 offline stub for an API request.
pub fn offline_stub(url: &Url) -> FetchResponse {
    let payload = stub_payload(url);
    let mut headers = HashMap::new();
    headers.insert(
        "content-type".to_string(),
        "application/json; charset=utf-8".to_string(),
    );
    FetchResponse {
        status: 503,
        headers,
        body: serde_json::to_vec(&payload).unwrap_or_default(),
        source: ResponseSource::Synthesized,
    }
}

fn stub_payload(url: &Url) -> serde_json::Value {
    let path = url.path();

    if path.starts_with("/api/categories") {
        return json!({
            "success": false,
            "offline": true,
            "categories": OFFLINE_CATEGORIES,
            "message": OFFLINE_MESSAGE,
        });
    }
    if path.starts_with("/api/daily_words") || path.starts_with("/api/daily-words") {
        return json!({
            "success": false,
            "offline": true,
            "day": requested_day(url),
            "words": [],
            "message": OFFLINE_MESSAGE,
        });
    }
    if path.starts_with("/api/words_by_category") {
        return json!({
            "success": false,
            "offline": true,
            "words": [],
            "message": OFFLINE_MESSAGE,
        });
    }
    if path.starts_with("/api/search_enhanced") {
        return json!({
            "success": false,
            "offline": true,
            "results": [],
            "message": OFFLINE_MESSAGE,
        });
    }
    if path.starts_with("/api/learning_statistics") {
        return json!({
            "success": false,
            "offline": true,
            "total_terms": 0,
            "studied_terms": 0,
            "message": OFFLINE_MESSAGE,
        });
    }

    json!({
        "success": false,
        "offline": true,
        "message": OFFLINE_MESSAGE,
    })
}

/// Echo the requested day back when it can be recovered from the URL,
/// either `?day=N` or a trailing `/daily-words/N` segment.
fn requested_day(url: &Url) -> serde_json::Value {
    let from_query = url
        .query_pairs()
        .find(|(name, _)| name == "day")
        .and_then(|(_, value)| value.parse::<u32>().ok());
    let from_path = url
        .path_segments()
        .and_then(|segments| segments.last().map(str::to_string))
        .and_then(|last| last.parse::<u32>().ok());

    match from_query.or(from_path) {
        Some(day) => json!(day),
        None => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_categories_stub_carries_full_list() {
        let response = offline_stub(&parse("http://localhost:5000/api/categories"));
        assert_eq!(response.status, 503);
        assert_eq!(response.source, ResponseSource::Synthesized);

        let payload = response.json().unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["offline"], true);
        assert_eq!(payload["categories"].as_array().unwrap().len(), 12);
        assert!(payload["message"].is_string());
    }

    #[test]
    fn test_daily_words_stub_echoes_day() {
        let payload =
            offline_stub(&parse("http://localhost:5000/api/daily_words?day=7"))
                .json()
                .unwrap();
        assert_eq!(payload["day"], 7);
        assert_eq!(payload["words"].as_array().unwrap().len(), 0);

        let payload = offline_stub(&parse("http://localhost:5000/api/daily-words/3"))
            .json()
            .unwrap();
        assert_eq!(payload["day"], 3);
    }

    #[test]
    fn test_statistics_stub_shape() {
        let payload =
            offline_stub(&parse("http://localhost:5000/api/learning_statistics"))
                .json()
                .unwrap();
        assert_eq!(payload["total_terms"], 0);
        assert_eq!(payload["studied_terms"], 0);
    }

    #[test]
    fn test_unknown_api_path_gets_bare_stub() {
        let payload = offline_stub(&parse("http://localhost:5000/api/tts/ko/hello"))
            .json()
            .unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["offline"], true);
        assert!(payload.get("categories").is_none());
        assert!(payload.get("words").is_none());
    }
}
