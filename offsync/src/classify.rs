//! Request classification.
//!
//! Every intercepted GET request is assigned to exactly one resource class,
//! derived purely from method and URL shape; the class picks the caching
//! strategy. Non-GET requests are not classified at all and pass through
//! the engine untouched.

use crate::request::{Destination, FetchRequest};
use regex::Regex;

/// Resource class of a classified request. Never persisted; recomputed per
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Navigable document.
    Document,
    /// Scripts, styles, fonts, images.
    StaticAsset,
    /// API path on the always-fresh list.
    ApiBypass,
    /// Any other API path.
    ApiCacheable,
}

/// Deterministic request-to-class mapping.
///
/// Bypass patterns take precedence over general API caching, so a path on
/// the always-fresh list is never served stale even if an earlier
/// misconfiguration left a cached entry behind.
#[derive(Debug)]
pub struct RequestClassifier {
    api_prefix: String,
    bypass: Vec<Regex>,
}

impl RequestClassifier {
    pub fn new(
        api_prefix: &str,
        bypass_patterns: &[String],
    ) -> Result<Self, regex::Error> {
        let bypass = bypass_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            api_prefix: api_prefix.to_string(),
            bypass,
        })
    }

    /// Classify a request. `None` means the request is not subject to the
    /// engine at all (non-GET methods).
    pub fn classify(&self, request: &FetchRequest) -> Option<ResourceClass> {
        if !request.is_get() {
            return None;
        }

        let path = request.url.path();
        if path.starts_with(&self.api_prefix) {
            if self.bypass.iter().any(|re| re.is_match(path)) {
                return Some(ResourceClass::ApiBypass);
            }
            return Some(ResourceClass::ApiCacheable);
        }

        if request.destination == Destination::Document {
            return Some(ResourceClass::Document);
        }

        Some(ResourceClass::StaticAsset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn classifier() -> RequestClassifier {
        RequestClassifier::new(
            "/api/",
            &[
                "^/api/daily[_-]words".to_string(),
                "^/api/generate_sample_data".to_string(),
            ],
        )
        .unwrap()
    }

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_non_get_is_not_classified() {
        let c = classifier();
        let request = FetchRequest::new(
            "POST",
            parse("http://localhost:5000/api/sync"),
            Destination::Other,
        );
        assert_eq!(c.classify(&request), None);
    }

    #[test]
    fn test_bypass_takes_precedence_over_api_caching() {
        let c = classifier();
        let request =
            FetchRequest::get(parse("http://localhost:5000/api/daily_words?day=1"));
        assert_eq!(c.classify(&request), Some(ResourceClass::ApiBypass));

        // The improved listing route spells it with a dash
        let request =
            FetchRequest::get(parse("http://localhost:5000/api/daily-words/3"));
        assert_eq!(c.classify(&request), Some(ResourceClass::ApiBypass));

        let request = FetchRequest::get(parse(
            "http://localhost:5000/api/generate_sample_data?count=100",
        ));
        assert_eq!(c.classify(&request), Some(ResourceClass::ApiBypass));
    }

    #[test]
    fn test_other_api_paths_are_cacheable() {
        let c = classifier();
        for path in [
            "/api/categories",
            "/api/words_by_category?category=비료",
            "/api/search_enhanced?q=tractor",
            "/api/learning_statistics",
        ] {
            let request =
                FetchRequest::get(parse(&format!("http://localhost:5000{path}")));
            assert_eq!(
                c.classify(&request),
                Some(ResourceClass::ApiCacheable),
                "path: {path}"
            );
        }
    }

    #[test]
    fn test_document_destination() {
        let c = classifier();
        let request =
            FetchRequest::document(parse("http://localhost:5000/mobile/improved"));
        assert_eq!(c.classify(&request), Some(ResourceClass::Document));
    }

    #[test]
    fn test_everything_else_is_static() {
        let c = classifier();
        for url in [
            "http://localhost:5000/static/js/improved_mobile_app.js",
            "http://localhost:5000/static/css/improved_mobile_app.css",
            "https://fonts.googleapis.com/css2?family=Battambang",
        ] {
            let request = FetchRequest::get(parse(url));
            assert_eq!(
                c.classify(&request),
                Some(ResourceClass::StaticAsset),
                "url: {url}"
            );
        }
    }
}
