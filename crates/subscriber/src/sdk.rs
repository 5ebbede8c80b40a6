//! SDK trait surface.
//!
//! The playback SDK (connection negotiation, media decode, bandwidth
//! shaping) is an external collaborator. This module defines the surface
//! the harness consumes: a log-level setter, a subscriber factory, and the
//! subscriber's async `init`/`play`/`stop` lifecycle plus its event feed.
//! The `mock` module provides a scripted implementation.

use crate::events::SubscriberEvent;
use async_trait::async_trait;
use common::config::{BandwidthConfig, EffectiveConfig};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

/// SDK log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkLogLevel {
    /// Full tracing of connection and media internals.
    Trace,
    /// Warnings and errors only.
    Warn,
}

/// Failures surfaced by SDK implementations.
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    #[error("connection failed: {0}")]
    ConnectFailure(String),

    #[error("playback failed: {0}")]
    PlaybackFailure(String),

    #[error("stop failed: {0}")]
    StopFailure(String),
}

/// Configuration handed to a subscriber's `init`.
///
/// Serialized to JSON when logging the effective subscribe parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriberConfig {
    /// WebSocket scheme ("ws" or "wss").
    pub protocol: String,

    /// WebSocket port on the edge server.
    pub port: u16,

    /// Edge server host resolved by the stream manager.
    pub host: String,

    /// Application scope.
    pub app: String,

    /// Stream to subscribe to.
    pub stream_name: String,

    /// Bandwidth settings.
    pub bandwidth: BandwidthConfig,
}

impl SubscriberConfig {
    /// Build the subscribe configuration from the effective testbed
    /// configuration and the resolved edge host.
    #[must_use]
    pub fn from_effective(
        effective: &EffectiveConfig,
        edge_host: String,
        stream_name: String,
    ) -> Self {
        Self {
            protocol: effective.protocol.clone(),
            port: effective.port,
            host: edge_host,
            app: effective.app.clone(),
            stream_name,
            bandwidth: effective.bandwidth,
        }
    }
}

/// Entry point into the playback SDK.
pub trait SubscriberSdk: Send + Sync {
    /// Set the SDK's log verbosity.
    fn set_log_level(&self, level: SdkLogLevel);

    /// Create a fresh subscriber instance.
    ///
    /// # Errors
    ///
    /// Returns `SdkError` if the SDK cannot allocate a subscriber.
    fn create_subscriber(&self) -> Result<Box<dyn Subscriber>, SdkError>;
}

/// One subscriber instance: the async `init → play → stop` lifecycle plus
/// the whole-feed event subscription.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Negotiate a connection for the given configuration.
    async fn init(&mut self, config: &SubscriberConfig) -> Result<(), SdkError>;

    /// Start playback on an initialized subscriber.
    async fn play(&mut self) -> Result<(), SdkError>;

    /// Stop playback and release the connection.
    async fn stop(&mut self) -> Result<(), SdkError>;

    /// Subscribe to the whole event feed.
    ///
    /// Dropping the receiver detaches the listener.
    fn subscribe_events(&mut self) -> mpsc::Receiver<SubscriberEvent>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::config::TestbedConfig;

    #[test]
    fn test_subscriber_config_from_effective() {
        let stored = TestbedConfig {
            host: Some("sm.example.com".to_string()),
            stream1: Some("mystream".to_string()),
            ..TestbedConfig::default()
        };
        let effective = EffectiveConfig::merge(&stored, false);

        let config = SubscriberConfig::from_effective(
            &effective,
            "10.0.0.7".to_string(),
            "mystream".to_string(),
        );

        // Host is the resolved edge, not the stream manager host.
        assert_eq!(config.host, "10.0.0.7");
        assert_eq!(config.protocol, "ws");
        assert_eq!(config.port, 8081);
        assert_eq!(config.app, "live");
        assert_eq!(config.stream_name, "mystream");
        assert_eq!(config.bandwidth, BandwidthConfig::default());
    }

    #[test]
    fn test_subscriber_config_serializes_for_logging() {
        let effective = EffectiveConfig::merge(&TestbedConfig::default(), true);
        let config = SubscriberConfig::from_effective(
            &effective,
            "edge.example.com".to_string(),
            "stream1".to_string(),
        );

        let json = serde_json::to_string(&config).expect("config should serialize");
        assert!(json.contains("\"host\":\"edge.example.com\""));
        assert!(json.contains("\"protocol\":\"wss\""));
        assert!(json.contains("\"port\":8083"));
    }
}
