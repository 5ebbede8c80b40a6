//! Streambed: headless subscribe harness.
//!
//! Resolves an edge server from the stream manager, drives the subscriber
//! SDK through its subscribe lifecycle, and tears everything down on
//! shutdown.

/// Module for environment configuration
pub mod config;

/// Module for the stream manager API client
pub mod sm_client;

/// Module for the testbed orchestrator
pub mod testbed;
