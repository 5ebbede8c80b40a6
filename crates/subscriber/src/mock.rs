//! Scripted mock SDK and recording sinks for testing.
//!
//! `MockSdk` plays a scripted event sequence into the event feed when
//! `play` succeeds, with per-phase failure toggles and call counters
//! observable through the shared [`MockSdkState`]. The recording sinks
//! capture everything the session pushes at the video and status surfaces.

use crate::events::SubscriberEvent;
use crate::sdk::{SdkError, SdkLogLevel, Subscriber, SubscriberConfig, SubscriberSdk};
use crate::status::{StatusSink, DEFAULT_TITLE_ELEMENT_ID};
use crate::view::{MediaSource, VideoSink, DEFAULT_VIDEO_ELEMENT_ID};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Observable state shared between a `MockSdk` and its subscribers.
#[derive(Default)]
pub struct MockSdkState {
    init_calls: AtomicUsize,
    play_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    log_level: Mutex<Option<SdkLogLevel>>,
    last_config: Mutex<Option<SubscriberConfig>>,
    events_tx: Mutex<Option<mpsc::Sender<SubscriberEvent>>>,
}

impl MockSdkState {
    /// Number of `init` calls made.
    #[must_use]
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Number of `play` calls made.
    #[must_use]
    pub fn play_calls(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }

    /// Number of `stop` calls made.
    #[must_use]
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// The log level last set on the SDK.
    #[must_use]
    pub fn log_level(&self) -> Option<SdkLogLevel> {
        self.log_level.lock().ok().and_then(|level| *level)
    }

    /// The configuration the last successful `init` received.
    #[must_use]
    pub fn last_config(&self) -> Option<SubscriberConfig> {
        self.last_config.lock().ok().and_then(|config| config.clone())
    }

    /// A clone of the event feed sender, once a listener subscribed.
    ///
    /// Lets tests inject events mid-session and detect the receiver
    /// being dropped.
    #[must_use]
    pub fn events_sender(&self) -> Option<mpsc::Sender<SubscriberEvent>> {
        self.events_tx.lock().ok().and_then(|tx| tx.clone())
    }
}

/// Scripted SDK implementation.
pub struct MockSdk {
    script: Vec<SubscriberEvent>,
    fail_init: bool,
    fail_play: bool,
    fail_stop: bool,
    state: Arc<MockSdkState>,
}

impl MockSdk {
    /// SDK whose subscribers emit the given events once `play` succeeds.
    #[must_use]
    pub fn with_events(script: Vec<SubscriberEvent>) -> Self {
        Self {
            script,
            fail_init: false,
            fail_play: false,
            fail_stop: false,
            state: Arc::new(MockSdkState::default()),
        }
    }

    /// SDK scripting a connect-then-play sequence for a placeholder stream.
    #[must_use]
    pub fn happy_path() -> Self {
        Self::with_events(vec![
            SubscriberEvent::ConnectSuccess,
            SubscriberEvent::SubscribeStart {
                source: MediaSource {
                    stream_name: "stream1".to_string(),
                    url: "rtc://edge/stream1".to_string(),
                },
            },
            SubscriberEvent::PlaybackTimeUpdate { time: 0.0 },
        ])
    }

    /// SDK whose subscribers fail `init`.
    #[must_use]
    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::with_events(vec![])
        }
    }

    /// SDK whose subscribers fail `play`.
    #[must_use]
    pub fn failing_play() -> Self {
        Self {
            fail_play: true,
            ..Self::with_events(vec![])
        }
    }

    /// SDK whose subscribers fail `stop`.
    #[must_use]
    pub fn failing_stop() -> Self {
        Self {
            fail_stop: true,
            ..Self::with_events(vec![])
        }
    }

    /// Handle on the observable SDK state.
    #[must_use]
    pub fn state(&self) -> Arc<MockSdkState> {
        self.state.clone()
    }
}

impl SubscriberSdk for MockSdk {
    fn set_log_level(&self, level: SdkLogLevel) {
        if let Ok(mut slot) = self.state.log_level.lock() {
            *slot = Some(level);
        }
    }

    fn create_subscriber(&self) -> Result<Box<dyn Subscriber>, SdkError> {
        Ok(Box::new(MockSubscriber {
            script: self.script.clone(),
            fail_init: self.fail_init,
            fail_play: self.fail_play,
            fail_stop: self.fail_stop,
            state: self.state.clone(),
            events_tx: None,
        }))
    }
}

/// Subscriber created by [`MockSdk`].
pub struct MockSubscriber {
    script: Vec<SubscriberEvent>,
    fail_init: bool,
    fail_play: bool,
    fail_stop: bool,
    state: Arc<MockSdkState>,
    events_tx: Option<mpsc::Sender<SubscriberEvent>>,
}

#[async_trait]
impl Subscriber for MockSubscriber {
    async fn init(&mut self, config: &SubscriberConfig) -> Result<(), SdkError> {
        self.state.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(SdkError::ConnectFailure("mock connect refused".to_string()));
        }
        if let Ok(mut slot) = self.state.last_config.lock() {
            *slot = Some(config.clone());
        }
        Ok(())
    }

    async fn play(&mut self) -> Result<(), SdkError> {
        self.state.play_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_play {
            return Err(SdkError::PlaybackFailure(
                "mock playback refused".to_string(),
            ));
        }
        if let Some(tx) = &self.events_tx {
            for event in &self.script {
                // Listener may already be gone; scripted delivery is best effort.
                let _ = tx.send(event.clone()).await;
            }
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), SdkError> {
        self.state.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err(SdkError::StopFailure("mock stop refused".to_string()));
        }
        Ok(())
    }

    fn subscribe_events(&mut self) -> mpsc::Receiver<SubscriberEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        if let Ok(mut slot) = self.state.events_tx.lock() {
            *slot = Some(tx.clone());
        }
        self.events_tx = Some(tx);
        rx
    }
}

/// Video sink that records every call for assertions.
pub struct RecordingVideoSink {
    element_id: String,
    attaches: AtomicUsize,
    pauses: AtomicUsize,
    clears: AtomicUsize,
    current: Mutex<Option<MediaSource>>,
}

impl Default for RecordingVideoSink {
    fn default() -> Self {
        Self {
            element_id: DEFAULT_VIDEO_ELEMENT_ID.to_string(),
            attaches: AtomicUsize::new(0),
            pauses: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
            current: Mutex::new(None),
        }
    }
}

impl RecordingVideoSink {
    /// Number of media sources attached.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        self.attaches.load(Ordering::SeqCst)
    }

    /// Number of pause calls.
    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    /// Number of clear-source calls.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// The currently attached media source, if any.
    #[must_use]
    pub fn current_source(&self) -> Option<MediaSource> {
        self.current.lock().ok().and_then(|source| source.clone())
    }
}

impl VideoSink for RecordingVideoSink {
    fn element_id(&self) -> &str {
        &self.element_id
    }

    fn attach_source(&self, source: &MediaSource) {
        self.attaches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(source.clone());
        }
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn clear_source(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.current.lock() {
            *slot = None;
        }
    }
}

/// Status sink that records titles and forwarded events.
pub struct RecordingStatusSink {
    title_element_id: String,
    titles: Mutex<Vec<String>>,
    events: Mutex<Vec<SubscriberEvent>>,
}

impl Default for RecordingStatusSink {
    fn default() -> Self {
        Self {
            title_element_id: DEFAULT_TITLE_ELEMENT_ID.to_string(),
            titles: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingStatusSink {
    /// The most recently published stream title.
    #[must_use]
    pub fn last_title(&self) -> Option<String> {
        self.titles
            .lock()
            .ok()
            .and_then(|titles| titles.last().cloned())
    }

    /// All forwarded events, in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<SubscriberEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl StatusSink for RecordingStatusSink {
    fn title_element_id(&self) -> &str {
        &self.title_element_id
    }

    fn set_stream_title(&self, title: &str) {
        if let Ok(mut titles) = self.titles.lock() {
            titles.push(title.to_string());
        }
    }

    fn on_event(&self, event: &SubscriberEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_config() -> SubscriberConfig {
        SubscriberConfig {
            protocol: "ws".to_string(),
            port: 8081,
            host: "10.0.0.7".to_string(),
            app: "live".to_string(),
            stream_name: "stream1".to_string(),
            bandwidth: common::config::BandwidthConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_scripted_events_delivered_on_play() {
        let sdk = MockSdk::with_events(vec![
            SubscriberEvent::ConnectSuccess,
            SubscriberEvent::SubscribeStop,
        ]);
        let mut subscriber = sdk.create_subscriber().expect("subscriber");
        let mut events = subscriber.subscribe_events();

        subscriber.init(&test_config()).await.expect("init");
        subscriber.play().await.expect("play");

        assert_eq!(events.recv().await, Some(SubscriberEvent::ConnectSuccess));
        assert_eq!(events.recv().await, Some(SubscriberEvent::SubscribeStop));
    }

    #[tokio::test]
    async fn test_failing_init_counts_calls() {
        let sdk = MockSdk::failing_init();
        let state = sdk.state();
        let mut subscriber = sdk.create_subscriber().expect("subscriber");

        let result = subscriber.init(&test_config()).await;
        assert!(matches!(result, Err(SdkError::ConnectFailure(_))));
        assert_eq!(state.init_calls(), 1);
        assert!(state.last_config().is_none());
    }

    #[tokio::test]
    async fn test_failing_play_emits_no_events() {
        let sdk = MockSdk::failing_play();
        let mut subscriber = sdk.create_subscriber().expect("subscriber");
        let mut events = subscriber.subscribe_events();

        subscriber.init(&test_config()).await.expect("init");
        let result = subscriber.play().await;

        assert!(matches!(result, Err(SdkError::PlaybackFailure(_))));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failing_stop() {
        let sdk = MockSdk::failing_stop();
        let state = sdk.state();
        let mut subscriber = sdk.create_subscriber().expect("subscriber");

        let result = subscriber.stop().await;
        assert!(matches!(result, Err(SdkError::StopFailure(_))));
        assert_eq!(state.stop_calls(), 1);
    }

    #[test]
    fn test_log_level_recorded() {
        let sdk = MockSdk::happy_path();
        let state = sdk.state();

        sdk.set_log_level(SdkLogLevel::Trace);
        assert_eq!(state.log_level(), Some(SdkLogLevel::Trace));

        sdk.set_log_level(SdkLogLevel::Warn);
        assert_eq!(state.log_level(), Some(SdkLogLevel::Warn));
    }

    #[test]
    fn test_recording_video_sink_tracks_source() {
        let sink = RecordingVideoSink::default();
        let source = MediaSource {
            stream_name: "stream1".to_string(),
            url: "rtc://edge/stream1".to_string(),
        };

        sink.attach_source(&source);
        assert_eq!(sink.attach_count(), 1);
        assert_eq!(sink.current_source(), Some(source));

        sink.clear_source();
        assert_eq!(sink.clear_count(), 1);
        assert!(sink.current_source().is_none());
    }
}
