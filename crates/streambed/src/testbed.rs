//! Testbed orchestrator.
//!
//! Owns the optional active `SubscriberSession` and sequences the flow:
//! load config → resolve edge address → subscribe → (later) unsubscribe
//! on unload. At most one subscriber/view pair is active at a time; a
//! second subscribe while a session exists is refused instead of
//! overwriting the live one.

use crate::config::Config;
use crate::sm_client::{base_url_for_host, SmClient, SmClientError};
use common::config::EffectiveConfig;
use common::session_store::SessionStore;
use std::sync::Arc;
use subscriber::sdk::{SdkLogLevel, SubscriberConfig, SubscriberSdk};
use subscriber::session::{SubscriberError, SubscriberSession};
use subscriber::status::StatusSink;
use subscriber::view::VideoSink;
use thiserror::Error;
use tracing::{info, warn};

/// Top-level testbed errors.
#[derive(Debug, Error)]
pub enum TestbedError {
    #[error("no host in testbed configuration")]
    MissingHost,

    #[error("no stream name in testbed configuration")]
    MissingStream,

    #[error("a subscriber session is already active")]
    AlreadySubscribed,

    #[error(transparent)]
    StreamManager(#[from] SmClientError),

    #[error(transparent)]
    Subscriber(#[from] SubscriberError),
}

/// The subscribe harness: effective configuration, SDK, sinks, and the
/// optional active session.
pub struct Testbed {
    sdk: Arc<dyn SubscriberSdk>,
    video: Arc<dyn VideoSink>,
    status: Arc<dyn StatusSink>,
    effective: EffectiveConfig,
    secure: bool,
    stream_manager_url: Option<String>,
    session: Option<SubscriberSession>,
}

impl Testbed {
    /// Build a testbed, loading the session store from the configured path.
    #[must_use]
    pub fn new(
        config: &Config,
        sdk: Arc<dyn SubscriberSdk>,
        video: Arc<dyn VideoSink>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let store = SessionStore::load(&config.session_store_path);
        Self::with_store(config, &store, sdk, video, status)
    }

    /// Build a testbed over an already-loaded session store (for testing).
    #[must_use]
    pub fn with_store(
        config: &Config,
        store: &SessionStore,
        sdk: Arc<dyn SubscriberSdk>,
        video: Arc<dyn VideoSink>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let effective = EffectiveConfig::merge(&store.testbed_config(), config.secure);

        let level = if effective.verbose_logging {
            SdkLogLevel::Trace
        } else {
            SdkLogLevel::Warn
        };
        sdk.set_log_level(level);

        Self {
            sdk,
            video,
            status,
            effective,
            secure: config.secure,
            stream_manager_url: config.stream_manager_url.clone(),
            session: None,
        }
    }

    /// The merged configuration the testbed runs with.
    #[must_use]
    pub fn effective_config(&self) -> &EffectiveConfig {
        &self.effective
    }

    /// Whether a subscriber session is currently held.
    #[must_use]
    pub fn has_active_session(&self) -> bool {
        self.session.is_some()
    }

    /// Resolve the edge server and start a subscription.
    ///
    /// # Errors
    ///
    /// - `TestbedError::AlreadySubscribed` - a session is already active
    /// - `TestbedError::MissingHost` / `MissingStream` - incomplete config
    /// - `TestbedError::StreamManager` - edge resolution failed
    /// - `TestbedError::Subscriber` - SDK init/play failed; the session is
    ///   kept so unload teardown still runs
    pub async fn subscribe(&mut self) -> Result<(), TestbedError> {
        if self.session.is_some() {
            return Err(TestbedError::AlreadySubscribed);
        }

        let host = self
            .effective
            .host
            .clone()
            .ok_or(TestbedError::MissingHost)?;
        let stream_name = self
            .effective
            .stream_name
            .clone()
            .ok_or(TestbedError::MissingStream)?;

        let base_url = self
            .stream_manager_url
            .clone()
            .unwrap_or_else(|| base_url_for_host(&host, self.secure));
        let sm_client = SmClient::new(base_url)?;
        let edge_host = sm_client
            .resolve_edge(&self.effective.app, &stream_name)
            .await?;

        let subscriber_config =
            SubscriberConfig::from_effective(&self.effective, edge_host, stream_name);
        let session = SubscriberSession::open(
            self.sdk.as_ref(),
            subscriber_config,
            self.video.clone(),
            self.status.clone(),
        )?;

        let session = self.session.insert(session);
        session.start().await?;
        Ok(())
    }

    /// Stop the active subscription, if any.
    ///
    /// With no active session this resolves immediately. On stop failure
    /// the session stays held; the unload path clears it unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `TestbedError::Subscriber` if the SDK stop fails.
    pub async fn unsubscribe(&mut self) -> Result<(), TestbedError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        session.close().await?;
        self.session = None;
        Ok(())
    }

    /// Shutdown path: unsubscribe, then clear the session references
    /// whether or not the unsubscribe succeeded.
    pub async fn unload(&mut self) {
        if let Err(e) = self.unsubscribe().await {
            warn!(target: "streambed.testbed", error = %e, "Unsubscribe failed during unload");
        }
        self.session = None;
        info!(target: "streambed.testbed", "Testbed unloaded");
    }
}
