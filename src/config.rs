use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u64 = 1;

/// Seconds between change-feed polls of the backend.
fn default_poll_interval() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct WaypointConfig {
    /// Base URL of the hosted backend (e.g. https://xyz.supabase.co).
    pub backend_url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    pub dark_mode: bool,
    pub debug_logging: bool,
    pub poll_interval_secs: u64,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            anon_key: String::new(),
            dark_mode: false,
            debug_logging: false,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl WaypointConfig {
    /// True once the backend connection settings are filled in.
    pub fn backend_ready(&self) -> bool {
        !self.backend_url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}
