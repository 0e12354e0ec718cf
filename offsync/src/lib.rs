//! # offsync: offline cache & sync engine
//!
//! `offsync` is a client-resident request-interception layer that keeps a
//! content-serving application usable without a reliable network. It sits
//! between the application's network calls and the actual network,
//! transparently caching responses, choosing a freshness strategy per
//! resource class, synthesizing fallback responses when both cache and
//! network fail, and deferring failed sync work for later retry.
//!
//! ## Features
//!
//! - **Request classification**: every intercepted GET is assigned to one
//!   resource class (document, static asset, API bypass, cacheable API);
//!   other methods pass through untouched.
//! - **Per-class strategies**: cache-first for documents and static assets,
//!   stale-while-revalidate for cacheable API paths, network-only for the
//!   always-fresh bypass list.
//! - **Offline fallbacks**: the pre-cached offline document for failed
//!   navigations, path-specific 503 JSON stubs for failed API calls.
//! - **Versioned namespaces**: install pre-caches a fixed manifest,
//!   activation garbage-collects every stale cache namespace and claims
//!   open pages.
//! - **Background sync**: deferred work queued while offline is
//!   transmitted in one batch on a connectivity trigger, all-or-nothing.
//! - **Control channel**: typed messages to query the version, clear all
//!   caches, or force activation.
//!
//! ## Modules
//!
//! - `classify`: request-to-resource-class mapping.
//! - `config`: explicit engine configuration.
//! - `control`: control-message protocol.
//! - `engine`: the event-dispatched engine itself.
//! - `fallback`: offline response synthesis.
//! - `fetcher`: the network boundary (reqwest-backed, mockable).
//! - `lifecycle`: deployment states and the client registry.
//! - `notify`: push/notification boundary.
//! - `request`: intercepted request/response model.
//! - `strategy`: the per-class caching strategies.
//! - `sync`: the background-sync drain.
pub mod classify;
pub mod config;
pub mod control;
pub mod engine;
pub mod fallback;
pub mod fetcher;
pub mod lifecycle;
pub mod notify;
pub mod request;
pub mod strategy;
pub mod sync;

pub use offsync_config as conf;
pub use offsync_queue as queue;
pub use offsync_store as store;

// re-export
pub use async_trait;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;
pub use url;

pub use crate::classify::{RequestClassifier, ResourceClass};
pub use crate::config::EngineConfig;
pub use crate::control::{ControlMessage, ControlReply};
pub use crate::engine::{Engine, Event, EventOutcome, FetchOutcome, SyncPayload};
pub use crate::fallback::{offline_stub, FallbackSynthesizer, OFFLINE_CATEGORIES};
pub use crate::fetcher::{
    AbstractFetcher, FetchError, HttpFetcher, HttpFetcherOptions, NetworkFetch,
};
pub use crate::lifecycle::{ClientPage, ClientRegistry, LifecycleState};
pub use crate::notify::{Notification, NotificationAction, PushPayload};
pub use crate::request::{Destination, FetchRequest, FetchResponse, ResponseSource};
pub use crate::strategy::StrategyExecutor;
pub use crate::sync::SyncDrain;

use offsync_queue::SyncQueueError;
use offsync_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Transport failure: {0}")]
    Transport(#[from] FetchError),
    #[error("Install failed for {url}: {reason}")]
    Install { url: String, reason: String },
    #[error("Sync batch rejected: {0}")]
    Sync(String),
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
    #[error("Sync queue error: {0}")]
    Queue(#[from] SyncQueueError),
    #[error("Invalid classifier pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid URL in configuration: {0}")]
    Config(#[from] url::ParseError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
