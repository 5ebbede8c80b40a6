//! Playback view and video sink seam.
//!
//! The browser testbed renders into a `<video>` element; the headless
//! harness renders into whatever implements `VideoSink`. `PlaybackView`
//! sits between the SDK's stream delivery and the sink, firing a
//! first-attach hook exactly once per view (the original wrapped the
//! attach call with a self-removing interceptor).

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Default element identifier for the video sink.
pub const DEFAULT_VIDEO_ELEMENT_ID: &str = "red5pro-subscriber-video";

/// A media stream delivered by the SDK for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSource {
    /// Name of the stream the source carries.
    pub stream_name: String,

    /// Opaque source locator handed to the sink.
    pub url: String,
}

/// Rendering target for a subscription.
pub trait VideoSink: Send + Sync {
    /// Identifier of the element this sink renders into.
    fn element_id(&self) -> &str;

    /// Attach a media source for playback.
    fn attach_source(&self, source: &MediaSource);

    /// Pause playback.
    fn pause(&self);

    /// Clear the attached media source.
    fn clear_source(&self);
}

/// Playback view bound to a video sink for the lifetime of one session.
pub struct PlaybackView {
    sink: Arc<dyn VideoSink>,
    subscriber_attached: AtomicBool,
    first_attach_seen: AtomicBool,
}

impl PlaybackView {
    /// Create a view over the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn VideoSink>) -> Self {
        Self {
            sink,
            subscriber_attached: AtomicBool::new(false),
            first_attach_seen: AtomicBool::new(false),
        }
    }

    /// Attach a media stream to the sink.
    ///
    /// The first attach on a view additionally fires a one-shot hook;
    /// every call attaches.
    pub fn attach_stream(&self, source: &MediaSource) {
        if !self.first_attach_seen.swap(true, Ordering::SeqCst) {
            debug!(
                target: "subscriber.view",
                element_id = self.sink.element_id(),
                stream = %source.stream_name,
                "First stream attached to playback view"
            );
        }
        self.sink.attach_source(source);
    }

    /// Whether the first-attach hook has fired.
    #[must_use]
    pub fn first_attach_seen(&self) -> bool {
        self.first_attach_seen.load(Ordering::SeqCst)
    }

    /// Bind a subscriber to this view.
    pub fn attach_subscriber(&self) {
        self.subscriber_attached.store(true, Ordering::SeqCst);
    }

    /// Unbind the subscriber from this view.
    pub fn detach_subscriber(&self) {
        self.subscriber_attached.store(false, Ordering::SeqCst);
    }

    /// Whether a subscriber is bound to this view.
    #[must_use]
    pub fn subscriber_attached(&self) -> bool {
        self.subscriber_attached.load(Ordering::SeqCst)
    }

    /// Clear the sink's media source.
    pub fn clear_source(&self) {
        self.sink.clear_source();
    }

    /// Stop any partial playback: pause the sink and clear its source.
    pub fn shutdown_video(&self) {
        self.sink.pause();
        self.sink.clear_source();
    }
}

/// Video sink that only logs sink calls.
///
/// Stand-in for a real rendering surface when the harness runs headless.
pub struct LogVideoSink {
    element_id: String,
}

impl LogVideoSink {
    /// Create a sink with a custom element identifier.
    #[must_use]
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl Default for LogVideoSink {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_ELEMENT_ID)
    }
}

impl VideoSink for LogVideoSink {
    fn element_id(&self) -> &str {
        &self.element_id
    }

    fn attach_source(&self, source: &MediaSource) {
        debug!(
            target: "subscriber.view",
            element_id = %self.element_id,
            stream = %source.stream_name,
            url = %source.url,
            "Attached media source"
        );
    }

    fn pause(&self) {
        debug!(target: "subscriber.view", element_id = %self.element_id, "Paused playback");
    }

    fn clear_source(&self) {
        debug!(target: "subscriber.view", element_id = %self.element_id, "Cleared media source");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::RecordingVideoSink;

    fn source(name: &str) -> MediaSource {
        MediaSource {
            stream_name: name.to_string(),
            url: format!("rtc://edge/{name}"),
        }
    }

    #[test]
    fn test_first_attach_hook_fires_once_but_every_call_attaches() {
        let sink = Arc::new(RecordingVideoSink::default());
        let view = PlaybackView::new(sink.clone());

        assert!(!view.first_attach_seen());

        view.attach_stream(&source("a"));
        assert!(view.first_attach_seen());

        view.attach_stream(&source("b"));
        assert!(view.first_attach_seen());

        // Both attaches reached the sink.
        assert_eq!(sink.attach_count(), 2);
        assert_eq!(
            sink.current_source().map(|s| s.stream_name),
            Some("b".to_string())
        );
    }

    #[test]
    fn test_subscriber_attach_detach() {
        let view = PlaybackView::new(Arc::new(RecordingVideoSink::default()));

        assert!(!view.subscriber_attached());
        view.attach_subscriber();
        assert!(view.subscriber_attached());
        view.detach_subscriber();
        assert!(!view.subscriber_attached());
    }

    #[test]
    fn test_shutdown_video_pauses_and_clears() {
        let sink = Arc::new(RecordingVideoSink::default());
        let view = PlaybackView::new(sink.clone());

        view.attach_stream(&source("a"));
        view.shutdown_video();

        assert_eq!(sink.pause_count(), 1);
        assert_eq!(sink.clear_count(), 1);
        assert!(sink.current_source().is_none());
    }

    #[test]
    fn test_log_sink_default_element_id() {
        let sink = LogVideoSink::default();
        assert_eq!(sink.element_id(), DEFAULT_VIDEO_ELEMENT_ID);
    }
}
