//! Testbed configuration types.
//!
//! The stored configuration blob is written by an external testbed UI and
//! read back here; every field is optional. Hardcoded defaults fill whatever
//! the blob omits, producing the effective configuration the harness runs
//! with. The merge happens once at startup; the result is discarded on
//! restart.

use serde::{Deserialize, Serialize};

/// Default application scope on the media server.
pub const DEFAULT_APP: &str = "live";

/// Default audio bandwidth in kbps.
pub const DEFAULT_AUDIO_BANDWIDTH: u32 = 50;

/// Default video bandwidth in kbps.
pub const DEFAULT_VIDEO_BANDWIDTH: u32 = 256;

/// Default data channel bandwidth in bps.
pub const DEFAULT_DATA_BANDWIDTH: u64 = 30_000_000;

/// Socket protocol and port derived from the transport scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketLocation {
    /// WebSocket scheme ("ws" or "wss").
    pub protocol: &'static str,
    /// WebSocket port on the media server.
    pub port: u16,
}

/// Map the transport scheme onto the media server's socket location.
///
/// Insecure deployments use plain WebSockets on 8081, secure ones use
/// TLS WebSockets on 8083.
#[must_use]
pub fn socket_location(secure: bool) -> SocketLocation {
    if secure {
        SocketLocation {
            protocol: "wss",
            port: 8083,
        }
    } else {
        SocketLocation {
            protocol: "ws",
            port: 8081,
        }
    }
}

/// Bandwidth settings for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandwidthConfig {
    /// Audio bandwidth in kbps.
    pub audio: u32,
    /// Video bandwidth in kbps.
    pub video: u32,
    /// Data channel bandwidth in bps.
    pub data: u64,
}

impl Default for BandwidthConfig {
    fn default() -> Self {
        Self {
            audio: DEFAULT_AUDIO_BANDWIDTH,
            video: DEFAULT_VIDEO_BANDWIDTH,
            data: DEFAULT_DATA_BANDWIDTH,
        }
    }
}

/// The stored testbed configuration blob.
///
/// Field names follow the wire format of the stored JSON (camelCase, with
/// the first stream slot named `stream1`). All fields are optional; parse
/// failures upstream collapse to `TestbedConfig::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestbedConfig {
    /// Stream manager / media server host.
    pub host: Option<String>,

    /// Application scope override.
    pub app: Option<String>,

    /// Name of the first stream slot.
    pub stream1: Option<String>,

    /// Enable trace-level SDK logging.
    pub verbose_logging: bool,

    /// Bandwidth overrides.
    pub bandwidth: Option<BandwidthConfig>,
}

/// Effective configuration after merging the stored blob with defaults.
///
/// Defaults fill anything the stored blob omits; the stored blob wins where
/// it speaks. Protocol and port are derived from the transport scheme, never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    /// WebSocket scheme the subscriber should use.
    pub protocol: String,

    /// WebSocket port on the media server.
    pub port: u16,

    /// Stream manager host, if configured.
    pub host: Option<String>,

    /// Application scope.
    pub app: String,

    /// Stream name from the first stream slot, if configured.
    pub stream_name: Option<String>,

    /// Enable trace-level SDK logging.
    pub verbose_logging: bool,

    /// Bandwidth settings.
    pub bandwidth: BandwidthConfig,
}

impl EffectiveConfig {
    /// Merge the stored configuration with hardcoded defaults.
    #[must_use]
    pub fn merge(stored: &TestbedConfig, secure: bool) -> Self {
        let socket = socket_location(secure);
        Self {
            protocol: socket.protocol.to_string(),
            port: socket.port,
            host: stored.host.clone(),
            app: stored.app.clone().unwrap_or_else(|| DEFAULT_APP.to_string()),
            stream_name: stored.stream1.clone(),
            verbose_logging: stored.verbose_logging,
            bandwidth: stored.bandwidth.unwrap_or_default(),
        }
    }
}
