//! Chooses where the next render's data comes from.

use meteomar_core::WeatherConfig;
use serde::Serialize;

/// Data origin for one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceDecision {
    /// Fetch from the provider, falling back to the cache on failure
    Live,
    Cached,
    Demo,
}

/// Network reachability as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connectivity {
    pub is_online: bool,
}

impl Connectivity {
    pub fn online() -> Self {
        Self { is_online: true }
    }

    pub fn offline() -> Self {
        Self { is_online: false }
    }
}

/// Decide the source. Pure; call again on every trigger.
///
/// No key means demo data whatever the connectivity; a key while offline
/// means cache; otherwise live.
pub fn resolve(config: &WeatherConfig, connectivity: Connectivity) -> SourceDecision {
    if config.api_key().is_none() {
        SourceDecision::Demo
    } else if !connectivity.is_online {
        SourceDecision::Cached
    } else {
        SourceDecision::Live
    }
}
