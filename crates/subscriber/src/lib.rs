//! Subscriber controller for the streambed harness.
//!
//! Wraps an external playback SDK behind trait seams: the SDK surface
//! (`SubscriberSdk`/`Subscriber`), the playback view over a video sink,
//! the status surface, and the `SubscriberSession` controller that owns
//! one subscriber/view pair and forwards the SDK's event feed.

/// Module for the tagged subscriber event type
pub mod events;

/// Module for the scripted mock SDK used in tests and the headless binary
pub mod mock;

/// Module for the SDK trait surface and subscriber configuration
pub mod sdk;

/// Module for the session controller owning one subscriber/view pair
pub mod session;

/// Module for the status surface (stream title, event hand-off)
pub mod status;

/// Module for the playback view and video sink seam
pub mod view;
