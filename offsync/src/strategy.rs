//! Per-class caching strategies.
//!
//! Exactly one strategy runs per classified request:
//! - `Document`/`StaticAsset`: cache-first
//! - `ApiCacheable`: stale-while-revalidate
//! - `ApiBypass`: network-only
//!
//! Failure handling is uniform: only a transport-level fetch failure hands
//! control to the fallback synthesizer. A response with a non-success
//! status is a valid response, returned as-is and never cached.

use crate::classify::ResourceClass;
use crate::fallback::FallbackSynthesizer;
use crate::fetcher::{AbstractFetcher, FetchError};
use crate::request::{FetchRequest, FetchResponse};
use crate::EngineError;
use offsync_store::AbstractCacheStore;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StrategyExecutor {
    store: AbstractCacheStore,
    fetcher: AbstractFetcher,
    static_namespace: String,
    api_namespace: String,
    fallback: FallbackSynthesizer,
}

impl StrategyExecutor {
    pub fn new(
        store: AbstractCacheStore,
        fetcher: AbstractFetcher,
        static_namespace: String,
        api_namespace: String,
        fallback: FallbackSynthesizer,
    ) -> Self {
        Self {
            store,
            fetcher,
            static_namespace,
            api_namespace,
            fallback,
        }
    }

    /// Run the strategy for `class`, producing the response handed back to
    /// the client.
    pub async fn execute(
        &self,
        class: ResourceClass,
        request: &FetchRequest,
    ) -> Result<FetchResponse, EngineError> {
        match class {
            ResourceClass::Document | ResourceClass::StaticAsset => {
                self.cache_first(class, request).await
            }
            ResourceClass::ApiCacheable => {
                self.stale_while_revalidate(class, request).await
            }
            ResourceClass::ApiBypass => self.network_only(class, request).await,
        }
    }

    /// Serve from the static namespace when present; otherwise fetch and
    /// cache successful responses.
    async fn cache_first(
        &self,
        class: ResourceClass,
        request: &FetchRequest,
    ) -> Result<FetchResponse, EngineError> {
        let key = request.cache_key();
        if let Some(snapshot) = self.store.get(&self.static_namespace, key).await? {
            debug!(url = key, "cache-first hit");
            return Ok(FetchResponse::from_snapshot(&snapshot));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store
                        .put(&self.static_namespace, key, response.to_snapshot())
                        .await?;
                }
                Ok(response)
            }
            Err(err) => self.offline(class, request, err).await,
        }
    }

    /// Serve the cached value immediately and refresh it in the background;
    /// on a miss, behave network-first.
    async fn stale_while_revalidate(
        &self,
        class: ResourceClass,
        request: &FetchRequest,
    ) -> Result<FetchResponse, EngineError> {
        let key = request.cache_key();
        if let Some(snapshot) = self.store.get(&self.api_namespace, key).await? {
            debug!(url = key, "stale-while-revalidate hit, refreshing");
            self.spawn_refresh(request.clone());
            return Ok(FetchResponse::from_snapshot(&snapshot));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store
                        .put(&self.api_namespace, key, response.to_snapshot())
                        .await?;
                }
                Ok(response)
            }
            Err(err) => self.offline(class, request, err).await,
        }
    }

    /// Always fetch; the API cache namespace is neither read nor written.
    async fn network_only(
        &self,
        class: ResourceClass,
        request: &FetchRequest,
    ) -> Result<FetchResponse, EngineError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(err) => self.offline(class, request, err).await,
        }
    }

    /// Detached revalidation. The caller already has its response; this
    /// task has no return channel and its failures are only logged.
    fn spawn_refresh(&self, request: FetchRequest) {
        let store = Arc::clone(&self.store);
        let fetcher = Arc::clone(&self.fetcher);
        let namespace = self.api_namespace.clone();
        tokio::spawn(async move {
            let key = request.cache_key().to_string();
            match fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    if let Err(err) =
                        store.put(&namespace, &key, response.to_snapshot()).await
                    {
                        warn!(url = %key, "refresh store failed: {err}");
                    }
                }
                Ok(response) => {
                    debug!(url = %key, status = response.status, "refresh skipped")
                }
                Err(err) => warn!(url = %key, "background refresh failed: {err}"),
            }
        });
    }

    async fn offline(
        &self,
        class: ResourceClass,
        request: &FetchRequest,
        err: FetchError,
    ) -> Result<FetchResponse, EngineError> {
        debug!(url = request.cache_key(), class = ?class, "network failed: {err}");
        match self
            .fallback
            .synthesize(
                self.store.as_ref(),
                &self.static_namespace,
                class,
                request,
            )
            .await?
        {
            Some(response) => Ok(response),
            None => Err(EngineError::Transport(err)),
        }
    }
}
