//! File-backed session store.
//!
//! The browser testbed keeps its configuration blob in `sessionStorage`;
//! the headless harness reads the same shape from a JSON file holding a
//! string-to-string map. Missing files and unparsable content both collapse
//! to an empty store so the harness falls back to defaults instead of
//! failing startup.

use crate::config::TestbedConfig;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Store key under which the testbed configuration blob lives.
pub const TESTBED_CONFIG_KEY: &str = "r5proTestBed";

/// A string-to-string map read from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore {
    /// Load the store from a JSON file.
    ///
    /// A missing file or an unparsable one yields an empty store with a
    /// warning; startup never fails on store problems.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    target: "common.session_store",
                    path = %path.display(),
                    error = %e,
                    "Could not read session store, starting with an empty store"
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(entries) => Self { entries },
            Err(e) => {
                warn!(
                    target: "common.session_store",
                    path = %path.display(),
                    error = %e,
                    "Could not parse session store, starting with an empty store"
                );
                Self::default()
            }
        }
    }

    /// Build a store from in-memory entries (for testing).
    #[must_use]
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Look up a raw entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Parse the stored testbed configuration blob.
    ///
    /// A missing or unparsable blob logs a warning and yields the empty
    /// configuration; defaults take over downstream.
    #[must_use]
    pub fn testbed_config(&self) -> TestbedConfig {
        let Some(raw) = self.get(TESTBED_CONFIG_KEY) else {
            warn!(
                target: "common.session_store",
                key = TESTBED_CONFIG_KEY,
                "No testbed configuration in session store, using defaults"
            );
            return TestbedConfig::default();
        };

        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    target: "common.session_store",
                    key = TESTBED_CONFIG_KEY,
                    error = %e,
                    "Could not read testbed configuration from session store"
                );
                TestbedConfig::default()
            }
        }
    }
}
