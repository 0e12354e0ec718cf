//! Engine configuration.
//!
//! Everything that used to be free-floating constants in the deployed
//! worker (namespace names, the pre-cache manifest, bypass patterns,
//! endpoints) is explicit configuration handed to the engine at
//! construction. `Default` carries the shipped product values; a YAML file
//! with an `engine:` section can override any subset.

use offsync_config::{ConfigError, Configurable};
use serde::{Deserialize, Serialize};
use std::path;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version tag reported over the control channel.
    pub version: String,
    /// Origin the relative manifest/endpoint paths resolve against.
    pub origin: String,
    /// Current namespace for documents and static assets.
    pub static_namespace: String,
    /// Current namespace for cacheable API responses.
    pub api_namespace: String,
    /// Path prefix identifying API requests.
    pub api_prefix: String,
    /// Always-fresh API path patterns (regular expressions).
    pub bypass_patterns: Vec<String>,
    /// URLs pre-fetched and stored at install time.
    pub precache_manifest: Vec<String>,
    /// Document served when a navigation fails offline.
    pub offline_document: String,
    /// Application page opened/focused on notification click.
    pub app_url: String,
    /// The only sync trigger tag this engine honors.
    pub sync_tag: String,
    /// Endpoint the sync batch is POSTed to.
    pub sync_endpoint: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "v2".to_string(),
            origin: "http://localhost:5000".to_string(),
            static_namespace: "terms-static-v2".to_string(),
            api_namespace: "terms-api-v2".to_string(),
            api_prefix: "/api/".to_string(),
            bypass_patterns: vec![
                "^/api/daily[_-]words".to_string(),
                "^/api/generate_sample_data".to_string(),
            ],
            precache_manifest: vec![
                "/mobile/improved".to_string(),
                "/static/js/improved_mobile_app.js".to_string(),
                "/static/css/improved_mobile_app.css".to_string(),
                "https://fonts.googleapis.com/css2?family=Noto+Sans+KR:wght@300;400;500;600;700&display=swap".to_string(),
                "https://fonts.googleapis.com/css2?family=Battambang:wght@400;700&display=swap".to_string(),
                "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css".to_string(),
            ],
            offline_document: "/mobile/improved".to_string(),
            app_url: "/mobile/improved".to_string(),
            sync_tag: "background-sync".to_string(),
            sync_endpoint: "/api/sync".to_string(),
        }
    }
}

struct RawConfig {
    config: serde_yaml::Value,
}

impl Configurable for RawConfig {
    fn config(&self) -> &serde_yaml::Value {
        &self.config
    }
}

impl EngineConfig {
    /// Load from a YAML file with an `engine:` section; missing fields fall
    /// back to the shipped defaults.
    pub fn from_yaml(
        config_file_path: impl AsRef<path::Path>,
    ) -> Result<Self, ConfigError> {
        let raw = RawConfig {
            config: RawConfig::load_config(config_file_path)?,
        };
        match raw.get_config_value("engine") {
            Some(section) => Ok(serde_yaml::from_value(section.clone())?),
            None => Ok(Self::default()),
        }
    }

    /// Resolve a manifest entry or endpoint against the configured origin.
    /// Absolute URLs pass through unchanged.
    pub fn resolve(&self, path_or_url: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.origin)?.join(path_or_url)
    }

    pub fn offline_document_url(&self) -> Result<Url, url::ParseError> {
        self.resolve(&self.offline_document)
    }

    pub fn app_page_url(&self) -> Result<Url, url::ParseError> {
        self.resolve(&self.app_url)
    }

    pub fn sync_endpoint_url(&self) -> Result<Url, url::ParseError> {
        self.resolve(&self.sync_endpoint)
    }

    /// The namespaces that survive activation; everything else is stale.
    pub fn current_namespaces(&self) -> [&str; 2] {
        [&self.static_namespace, &self.api_namespace]
    }
}
