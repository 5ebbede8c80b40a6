//! Common configuration and types shared across streambed components.

#![warn(clippy::pedantic)]

/// Module for testbed configuration (stored blob, defaults, merge)
pub mod config;

/// Module for the file-backed session store
pub mod session_store;

/// Module for common data types
pub mod types;
