//! Client configuration for the backend endpoints.

use std::time::Duration;

/// Connect and per-request timeouts for REST calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientTimeout {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for ClientTimeout {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(30),
        }
    }
}

/// Where the backend lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// REST base, without the `/api` prefix.
    pub base_url: String,
    /// WebSocket endpoint for the duel channel.
    pub channel_url: String,
    pub timeout: ClientTimeout,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            channel_url: "ws://localhost:8080/ws".to_string(),
            timeout: ClientTimeout::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let channel_url = derive_channel_url(&base_url);
        Self {
            base_url,
            channel_url,
            timeout: ClientTimeout::default(),
        }
    }

    /// Build a config from environment overrides on top of the defaults.
    ///
    /// Recognized variables: `HEROCLASH_API_URL`, `HEROCLASH_CHANNEL_URL`,
    /// `HEROCLASH_TIMEOUT_SECS`, `HEROCLASH_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("HEROCLASH_API_URL") {
            Ok(base_url) => Self::new(base_url),
            Err(_) => Self::default(),
        };
        if let Ok(channel_url) = std::env::var("HEROCLASH_CHANNEL_URL") {
            config.channel_url = channel_url;
        }
        if let Some(secs) = env_secs("HEROCLASH_TIMEOUT_SECS") {
            config.timeout.request = secs;
        }
        if let Some(secs) = env_secs("HEROCLASH_CONNECT_TIMEOUT_SECS") {
            config.timeout.connect = secs;
        }
        config
    }

    /// REST endpoint under `/api`, e.g. `api_endpoint("games/search")`.
    pub fn api_endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    let raw = std::env::var(name).ok()?;
    raw.parse::<u64>().ok().map(Duration::from_secs)
}

/// Swap the scheme so `http://host` becomes `ws://host/ws`.
fn derive_channel_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        trimmed.to_string()
    };
    format!("{ws_base}/ws")
}
