//! Status surface.
//!
//! The browser testbed publishes the stream title into a `stream-title`
//! element and hands every subscriber event to a page-level status handler.
//! `StatusSink` is the headless seam for both.

use crate::events::SubscriberEvent;
use tracing::info;

/// Default element identifier for the stream title slot.
pub const DEFAULT_TITLE_ELEMENT_ID: &str = "stream-title";

/// Receiver for stream title updates and forwarded subscriber events.
pub trait StatusSink: Send + Sync {
    /// Identifier of the title slot this sink writes into.
    fn title_element_id(&self) -> &str;

    /// Publish the stream title.
    fn set_stream_title(&self, title: &str);

    /// Receive a forwarded subscriber event.
    fn on_event(&self, event: &SubscriberEvent);
}

/// Status sink that only logs.
pub struct LogStatusSink {
    title_element_id: String,
}

impl LogStatusSink {
    /// Create a sink with a custom title slot identifier.
    #[must_use]
    pub fn new(title_element_id: impl Into<String>) -> Self {
        Self {
            title_element_id: title_element_id.into(),
        }
    }
}

impl Default for LogStatusSink {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_ELEMENT_ID)
    }
}

impl StatusSink for LogStatusSink {
    fn title_element_id(&self) -> &str {
        &self.title_element_id
    }

    fn set_stream_title(&self, title: &str) {
        info!(
            target: "subscriber.status",
            element_id = %self.title_element_id,
            title = %title,
            "Stream title updated"
        );
    }

    fn on_event(&self, event: &SubscriberEvent) {
        info!(target: "subscriber.status", event = event.wire_name(), "Status update");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sink_default_title_element_id() {
        let sink = LogStatusSink::default();
        assert_eq!(sink.title_element_id(), DEFAULT_TITLE_ELEMENT_ID);
    }
}
