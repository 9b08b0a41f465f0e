//! Engine configuration (defaults + environment overrides)

use crate::SEARCH_RADIUS_M;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Facility search radius around the candidate site (meters)
    pub search_radius_m: f64,
    /// Upper bound on a POI lookup before it counts as unavailable
    pub poi_timeout_sec: u64,
    /// Upper bound on narrative generation before the fallback is used
    pub narrative_timeout_sec: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_radius_m: SEARCH_RADIUS_M,
            poi_timeout_sec: 30,
            narrative_timeout_sec: 20,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `POI_TIMEOUT_SEC` / `NARRATIVE_TIMEOUT_SEC`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            search_radius_m: defaults.search_radius_m,
            poi_timeout_sec: env_u64("POI_TIMEOUT_SEC", defaults.poi_timeout_sec),
            narrative_timeout_sec: env_u64("NARRATIVE_TIMEOUT_SEC", defaults.narrative_timeout_sec),
        }
    }

    pub fn poi_timeout(&self) -> Duration {
        Duration::from_secs(self.poi_timeout_sec)
    }

    pub fn narrative_timeout(&self) -> Duration {
        Duration::from_secs(self.narrative_timeout_sec)
    }
}

/// Read a numeric env var, falling back on absence or parse failure
pub(crate) fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a non-empty string env var
pub(crate) fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
