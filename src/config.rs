//! Server configuration loaded from environment variables

use std::time::Duration;

/// How long the automatic phases stay on screen. A zero duration disables
/// the timer, leaving the transition to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTimers {
    /// Word reveal window (words -> clues)
    pub reveal: Duration,
    /// Results display pause (results -> next round)
    pub results: Duration,
}

impl Default for PhaseTimers {
    fn default() -> Self {
        Self {
            reveal: Duration::from_secs(10),
            results: Duration::from_secs(8),
        }
    }
}

impl PhaseTimers {
    /// Timers that never fire
    pub fn manual() -> Self {
        Self {
            reveal: Duration::ZERO,
            results: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Only origin allowed by CORS (None = permissive)
    pub cors_origin: Option<String>,
    /// Rooms older than this are evicted
    pub room_ttl: Duration,
    /// How often the sweeper looks for stale rooms
    pub sweep_interval: Duration,
    pub timers: PhaseTimers,
    /// JSON file with word pairs (None = built-in catalog)
    pub word_pairs_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_origin: None,
            room_ttl: Duration::from_secs(2 * 60 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
            timers: PhaseTimers::default(),
            word_pairs_path: None,
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = parse_env("PORT").unwrap_or(defaults.port);

        let cors_origin = non_empty_env("CORS_ORIGIN");
        if cors_origin.is_none() {
            tracing::warn!("CORS_ORIGIN not set, allowing any origin");
        }

        let room_ttl = parse_env("ROOM_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.room_ttl);

        let sweep_interval = parse_env("SWEEP_INTERVAL_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.sweep_interval);

        let timers = PhaseTimers {
            reveal: parse_env("REVEAL_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timers.reveal),
            results: parse_env("RESULTS_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timers.results),
        };

        let word_pairs_path = non_empty_env("WORD_PAIRS_PATH");

        tracing::info!(
            port,
            room_ttl_secs = room_ttl.as_secs(),
            sweep_interval_secs = sweep_interval.as_secs(),
            reveal_secs = timers.reveal.as_secs(),
            results_secs = timers.results.as_secs(),
            "Server config loaded"
        );

        Self {
            port,
            cors_origin,
            room_ttl,
            sweep_interval,
            timers,
            word_pairs_path,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a numeric env var; unparseable values are ignored with a warning
fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_env(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid value, using default");
            None
        }
    }
}
