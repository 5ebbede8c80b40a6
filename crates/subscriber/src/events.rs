//! Subscriber lifecycle events.
//!
//! The SDK delivers its whole event feed over one channel; the tagged enum
//! here replaces the original wildcard listener's switch-on-type. Wire names
//! follow the SDK's dotted event identifiers.

use crate::view::MediaSource;

/// An event emitted by the subscriber SDK during a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriberEvent {
    /// Connection to the edge server was established.
    ConnectSuccess,

    /// Connection to the edge server failed.
    ConnectFailure {
        /// SDK-provided failure reason.
        reason: String,
    },

    /// Connection to the edge server was closed.
    ConnectClosed,

    /// Playback started; carries the media stream to attach to the view.
    SubscribeStart {
        /// The media stream delivered by the SDK.
        source: MediaSource,
    },

    /// Subscription failed after the connection was established.
    SubscribeFail {
        /// SDK-provided failure reason.
        reason: String,
    },

    /// The requested stream name is not known to the server.
    SubscribeInvalidName,

    /// Playback stopped.
    SubscribeStop,

    /// In-stream metadata arrived.
    SubscribeMetadata {
        /// Raw metadata payload.
        metadata: serde_json::Value,
    },

    /// The publisher unpublished the stream.
    PlayUnpublish,

    /// Playback volume changed.
    VolumeChange {
        /// New volume in the range 0.0..=1.0.
        volume: f64,
    },

    /// Playback clock advanced.
    PlaybackTimeUpdate {
        /// Current playback time in seconds.
        time: f64,
    },
}

impl SubscriberEvent {
    /// The SDK's dotted wire name for this event.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            SubscriberEvent::ConnectSuccess => "Connect.Success",
            SubscriberEvent::ConnectFailure { .. } => "Connect.Failure",
            SubscriberEvent::ConnectClosed => "Connect.Closed",
            SubscriberEvent::SubscribeStart { .. } => "Subscribe.Start",
            SubscriberEvent::SubscribeFail { .. } => "Subscribe.Fail",
            SubscriberEvent::SubscribeInvalidName => "Subscribe.InvalidName",
            SubscriberEvent::SubscribeStop => "Subscribe.Stop",
            SubscriberEvent::SubscribeMetadata { .. } => "Subscribe.Metadata",
            SubscriberEvent::PlayUnpublish => "Subscribe.Play.Unpublish",
            SubscriberEvent::VolumeChange { .. } => "Subscribe.Volume.Change",
            SubscriberEvent::PlaybackTimeUpdate { .. } => "Subscribe.Time.Update",
        }
    }

    /// Whether this event means playback cannot proceed.
    ///
    /// Failure events tear down any partial playback in the video sink
    /// before the status surface is notified.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SubscriberEvent::ConnectFailure { .. } | SubscriberEvent::SubscribeFail { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(SubscriberEvent::ConnectSuccess.wire_name(), "Connect.Success");
        assert_eq!(
            SubscriberEvent::ConnectFailure {
                reason: "timeout".to_string()
            }
            .wire_name(),
            "Connect.Failure"
        );
        assert_eq!(
            SubscriberEvent::SubscribeFail {
                reason: "no edge".to_string()
            }
            .wire_name(),
            "Subscribe.Fail"
        );
        assert_eq!(
            SubscriberEvent::PlayUnpublish.wire_name(),
            "Subscribe.Play.Unpublish"
        );
    }

    #[test]
    fn test_failure_classification() {
        assert!(SubscriberEvent::ConnectFailure {
            reason: String::new()
        }
        .is_failure());
        assert!(SubscriberEvent::SubscribeFail {
            reason: String::new()
        }
        .is_failure());
        assert!(!SubscriberEvent::ConnectSuccess.is_failure());
        assert!(!SubscriberEvent::SubscribeStop.is_failure());
        assert!(!SubscriberEvent::SubscribeInvalidName.is_failure());
    }
}
