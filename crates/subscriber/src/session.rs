//! Subscriber session controller.
//!
//! A `SubscriberSession` owns exactly one subscriber/view pair for the
//! lifetime of one subscription. Opening a session creates the subscriber,
//! binds the playback view, publishes the stream title, and spawns the
//! event forwarder; `start` drives the async `init → play` chain; `close`
//! stops playback and detaches everything. A failed `start` keeps the
//! session handles alive so the unload path can still run teardown.

use crate::events::SubscriberEvent;
use crate::sdk::{SdkError, Subscriber, SubscriberConfig, SubscriberSdk};
use crate::status::StatusSink;
use crate::view::{PlaybackView, VideoSink};
use chrono::{DateTime, Utc};
use common::types::SessionId;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Session-level subscriber errors.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("subscriber already started")]
    AlreadyStarted,

    #[error("subscriber SDK error: {0}")]
    Sdk(#[from] SdkError),

    #[error("could not unsubscribe: {source}")]
    Stop {
        #[source]
        source: SdkError,
    },
}

/// One active subscription: subscriber, playback view, and event forwarder.
pub struct SubscriberSession {
    id: SessionId,
    opened_at: DateTime<Utc>,
    config: SubscriberConfig,
    subscriber: Box<dyn Subscriber>,
    view: Arc<PlaybackView>,
    cancel: CancellationToken,
    forwarder: JoinHandle<()>,
    started: bool,
}

impl SubscriberSession {
    /// Open a session: create the subscriber, bind the view, publish the
    /// stream title, and spawn the event forwarder.
    ///
    /// Must run inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SubscriberError::Sdk` if the SDK cannot create a subscriber.
    pub fn open(
        sdk: &dyn SubscriberSdk,
        config: SubscriberConfig,
        video: Arc<dyn VideoSink>,
        status: Arc<dyn StatusSink>,
    ) -> Result<Self, SubscriberError> {
        let config_json = serde_json::to_string_pretty(&config)
            .unwrap_or_else(|_| "<unserializable>".to_string());
        info!(target: "subscriber.session", config = %config_json, "Subscribe configuration");

        let view = Arc::new(PlaybackView::new(video));
        let mut subscriber = sdk.create_subscriber()?;

        view.attach_subscriber();
        status.set_stream_title(&config.stream_name);

        let events = subscriber.subscribe_events();
        let cancel = CancellationToken::new();
        let forwarder = tokio::spawn(forward_events(
            events,
            cancel.clone(),
            view.clone(),
            status,
        ));

        let id = SessionId::new();
        info!(target: "subscriber.session", session_id = %id, "Subscriber session opened");

        Ok(Self {
            id,
            opened_at: Utc::now(),
            config,
            subscriber,
            view,
            cancel,
            forwarder,
            started: false,
        })
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// When the session was opened.
    #[must_use]
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The subscribe configuration this session runs with.
    #[must_use]
    pub fn config(&self) -> &SubscriberConfig {
        &self.config
    }

    /// The playback view bound to this session.
    #[must_use]
    pub fn view(&self) -> &PlaybackView {
        &self.view
    }

    /// Whether the event forwarder has exited.
    #[must_use]
    pub fn forwarder_finished(&self) -> bool {
        self.forwarder.is_finished()
    }

    /// Drive the `init → play` chain.
    ///
    /// # Errors
    ///
    /// Returns `SubscriberError::AlreadyStarted` on a repeated call, or
    /// `SubscriberError::Sdk` if init or play fails. The session handles
    /// stay alive on failure; teardown still runs through `close`.
    pub async fn start(&mut self) -> Result<(), SubscriberError> {
        if self.started {
            return Err(SubscriberError::AlreadyStarted);
        }
        self.started = true;

        let result = match self.subscriber.init(&self.config).await {
            Ok(()) => self.subscriber.play().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(target: "subscriber.session", session_id = %self.id, "Subscribe complete");
                Ok(())
            }
            Err(e) => {
                error!(
                    target: "subscriber.session",
                    session_id = %self.id,
                    error = %e,
                    "Subscribe failed"
                );
                Err(SubscriberError::Sdk(e))
            }
        }
    }

    /// Stop the subscriber and detach everything.
    ///
    /// On success the view's media source is cleared, the subscriber is
    /// detached from the view, and the event forwarder is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `SubscriberError::Stop` if the SDK stop fails; the session
    /// stays intact so the unload path can clear it unconditionally.
    pub async fn close(&mut self) -> Result<(), SubscriberError> {
        match self.subscriber.stop().await {
            Ok(()) => {
                self.view.clear_source();
                self.view.detach_subscriber();
                self.cancel.cancel();
                info!(target: "subscriber.session", session_id = %self.id, "Unsubscribe complete");
                Ok(())
            }
            Err(e) => {
                error!(
                    target: "subscriber.session",
                    session_id = %self.id,
                    error = %e,
                    "Unsubscribe failed"
                );
                Err(SubscriberError::Stop { source: e })
            }
        }
    }
}

impl Drop for SubscriberSession {
    fn drop(&mut self) {
        // Dropping the session must not leave the forwarder running.
        self.cancel.cancel();
    }
}

/// Forward the subscriber's event feed to the status sink.
///
/// Every event is logged with its wire name. Failure events tear down any
/// partial playback in the video sink before the status sink is notified;
/// `Subscribe.Start` attaches the delivered media stream to the view.
async fn forward_events(
    mut events: mpsc::Receiver<SubscriberEvent>,
    cancel: CancellationToken,
    view: Arc<PlaybackView>,
    status: Arc<dyn StatusSink>,
) {
    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        info!(target: "subscriber.session", event = event.wire_name(), "Subscriber event");

        match &event {
            SubscriberEvent::SubscribeStart { source } => view.attach_stream(source),
            SubscriberEvent::ConnectFailure { .. } | SubscriberEvent::SubscribeFail { .. } => {
                view.shutdown_video();
            }
            SubscriberEvent::ConnectSuccess
            | SubscriberEvent::ConnectClosed
            | SubscriberEvent::SubscribeInvalidName
            | SubscriberEvent::SubscribeStop
            | SubscriberEvent::SubscribeMetadata { .. }
            | SubscriberEvent::PlayUnpublish
            | SubscriberEvent::VolumeChange { .. }
            | SubscriberEvent::PlaybackTimeUpdate { .. } => {}
        }

        status.on_event(&event);
    }
}
