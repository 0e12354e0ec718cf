//! The engine: one value per deployed version, driven by discrete events.
//!
//! Every event kind maps to one handler through `dispatch`; handlers are
//! independent and never serialized against each other. Each fetch handler
//! awaits its own cache lookup and at most one network fetch; the only
//! detached work is the stale-while-revalidate refresh, which has no
//! return channel.

use crate::classify::RequestClassifier;
use crate::config::EngineConfig;
use crate::control::{ControlMessage, ControlReply};
use crate::fallback::FallbackSynthesizer;
use crate::fetcher::AbstractFetcher;
use crate::lifecycle::{ClientPage, ClientRegistry, LifecycleState};
use crate::notify::{self, Notification, PushPayload};
use crate::request::{FetchRequest, FetchResponse};
use crate::strategy::StrategyExecutor;
use crate::sync::SyncDrain;
use crate::EngineError;
use offsync_queue::AbstractSyncQueue;
use offsync_store::AbstractCacheStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Payload type for sync tasks handed to the engine. The engine never
/// inspects it; the queue crate stays generic for other payload types.
pub type SyncPayload = serde_json::Value;

/// An event delivered to the engine.
#[derive(Debug)]
pub enum Event {
    Install,
    Activate,
    Fetch(FetchRequest),
    Message(ControlMessage),
    Sync(String),
    Push(PushPayload),
}

/// What an event settled to.
#[derive(Debug)]
pub enum EventOutcome {
    /// Response produced for an intercepted request.
    Response(FetchResponse),
    /// Request not handled by the engine; forward to the network untouched.
    Passthrough,
    /// Optional reply to a control message.
    Reply(Option<ControlReply>),
    /// Number of sync tasks transmitted.
    Synced(usize),
    /// Notification to display.
    Notify(Notification),
    /// Event fully settled with nothing to return.
    Settled,
}

/// Decision for an intercepted request.
#[derive(Debug)]
pub enum FetchOutcome {
    Handled(FetchResponse),
    Passthrough,
}

pub struct Engine {
    config: EngineConfig,
    store: AbstractCacheStore,
    fetcher: AbstractFetcher,
    classifier: RequestClassifier,
    executor: StrategyExecutor,
    drain: SyncDrain<SyncPayload>,
    clients: Arc<ClientRegistry>,
    state: RwLock<LifecycleState>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        store: AbstractCacheStore,
        fetcher: AbstractFetcher,
        queue: AbstractSyncQueue<SyncPayload>,
    ) -> Result<Self, EngineError> {
        let classifier =
            RequestClassifier::new(&config.api_prefix, &config.bypass_patterns)?;
        let fallback = FallbackSynthesizer::new(config.offline_document_url()?);
        let executor = StrategyExecutor::new(
            Arc::clone(&store),
            Arc::clone(&fetcher),
            config.static_namespace.clone(),
            config.api_namespace.clone(),
            fallback,
        );
        let drain = SyncDrain::new(
            queue,
            Arc::clone(&fetcher),
            config.sync_endpoint_url()?,
            config.sync_tag.clone(),
        );

        Ok(Self {
            config,
            store,
            fetcher,
            classifier,
            executor,
            drain,
            clients: Arc::new(ClientRegistry::new()),
            state: RwLock::new(LifecycleState::Idle),
        })
    }

    /// Dispatch an event to its handler.
    pub async fn dispatch(&self, event: Event) -> Result<EventOutcome, EngineError> {
        match event {
            Event::Install => self.install().await.map(|_| EventOutcome::Settled),
            Event::Activate => self.activate().await.map(|_| EventOutcome::Settled),
            Event::Fetch(request) => {
                self.handle_fetch(&request).await.map(|outcome| match outcome {
                    FetchOutcome::Handled(response) => {
                        EventOutcome::Response(response)
                    }
                    FetchOutcome::Passthrough => EventOutcome::Passthrough,
                })
            }
            Event::Message(message) => {
                self.handle_message(message).await.map(EventOutcome::Reply)
            }
            Event::Sync(tag) => {
                self.handle_sync(&tag).await.map(EventOutcome::Synced)
            }
            Event::Push(payload) => {
                Ok(EventOutcome::Notify(self.handle_push(&payload)))
            }
        }
    }

    /// Pre-cache the manifest into the current static namespace. Strict:
    /// any single URL failing (transport or non-success status) fails the
    /// whole install and the deployment never activates.
    pub async fn install(&self) -> Result<(), EngineError> {
        *self.state.write().await = LifecycleState::Installing;
        info!(
            version = %self.config.version,
            count = self.config.precache_manifest.len(),
            "installing: pre-caching manifest"
        );

        for entry in &self.config.precache_manifest {
            let url = self.config.resolve(entry)?;
            let request = FetchRequest::get(url.clone());

            let failure = match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    self.store
                        .put(
                            &self.config.static_namespace,
                            url.as_str(),
                            response.to_snapshot(),
                        )
                        .await?;
                    None
                }
                Ok(response) => Some(format!("status {}", response.status)),
                Err(err) => Some(err.to_string()),
            };

            if let Some(reason) = failure {
                error!(url = %url, reason = %reason, "install failed");
                *self.state.write().await = LifecycleState::Failed;
                return Err(EngineError::Install {
                    url: url.to_string(),
                    reason,
                });
            }
        }

        *self.state.write().await = LifecycleState::Waiting;
        info!(version = %self.config.version, "installed, waiting to activate");
        Ok(())
    }

    /// Garbage-collect stale namespaces, then claim every open page so it
    /// is served by this version without a reload.
    pub async fn activate(&self) -> Result<(), EngineError> {
        {
            let state = self.state.read().await;
            if *state != LifecycleState::Waiting {
                return Err(EngineError::Lifecycle(format!(
                    "cannot activate from state {state}"
                )));
            }
        }
        *self.state.write().await = LifecycleState::Activating;

        let current = self.config.current_namespaces();
        for name in self.store.namespaces().await? {
            if !current.contains(&name.as_str()) {
                info!(namespace = %name, "deleting stale cache namespace");
                self.store.delete_namespace(&name).await?;
            }
        }

        let claimed = self.clients.claim();
        *self.state.write().await = LifecycleState::Active;
        info!(version = %self.config.version, claimed, "activated");
        Ok(())
    }

    /// Intercept an outgoing request. Non-GET methods pass through the
    /// engine untouched.
    pub async fn handle_fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<FetchOutcome, EngineError> {
        let Some(class) = self.classifier.classify(request) else {
            debug!(method = %request.method, url = %request.url, "passthrough");
            return Ok(FetchOutcome::Passthrough);
        };

        let response = self.executor.execute(class, request).await?;
        Ok(FetchOutcome::Handled(response))
    }

    /// Process a control message in receipt order, producing an optional
    /// reply for the client's reply channel.
    pub async fn handle_message(
        &self,
        message: ControlMessage,
    ) -> Result<Option<ControlReply>, EngineError> {
        match message {
            ControlMessage::SkipWaiting => {
                let state = *self.state.read().await;
                if state == LifecycleState::Waiting {
                    info!("skip-waiting requested, activating now");
                    self.activate().await?;
                } else {
                    debug!(%state, "skip-waiting ignored");
                }
                Ok(None)
            }
            ControlMessage::GetVersion => Ok(Some(ControlReply::Version {
                version: self.config.version.clone(),
            })),
            ControlMessage::ClearCache => {
                let mut success = true;
                match self.store.namespaces().await {
                    Ok(names) => {
                        for name in names {
                            if let Err(err) =
                                self.store.delete_namespace(&name).await
                            {
                                error!(namespace = %name, "clear failed: {err}");
                                success = false;
                            }
                        }
                    }
                    Err(err) => {
                        error!("clear failed to enumerate namespaces: {err}");
                        success = false;
                    }
                }
                info!(success, "cache cleared");
                Ok(Some(ControlReply::CacheCleared { success }))
            }
            ControlMessage::Unknown => {
                debug!("ignoring unknown control message");
                Ok(None)
            }
        }
    }

    /// Handle a connectivity-regained trigger by draining the sync queue.
    pub async fn handle_sync(&self, tag: &str) -> Result<usize, EngineError> {
        match self.drain.on_trigger(tag).await {
            Ok(count) => Ok(count),
            Err(err) => {
                // Never escalated to the user; the queue is intact and the
                // next trigger retries.
                warn!("sync drain failed: {err}");
                Err(err)
            }
        }
    }

    /// Map an inbound push payload to a displayable notification.
    pub fn handle_push(&self, payload: &PushPayload) -> Notification {
        let notification = Notification::from_push(payload);
        info!(title = %notification.title, "push received");
        notification
    }

    /// Route a notification click to the application page.
    pub fn handle_notification_click(&self) -> Result<ClientPage, EngineError> {
        let app_url = self.config.app_page_url()?;
        Ok(notify::on_notification_click(&self.clients, &app_url))
    }

    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
