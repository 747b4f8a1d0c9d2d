use std::env;

use crate::constants::{
    BACKOFF_SECS, BOSS_INTERVAL_SECS, DEFAULT_BASE_URL, DEFAULT_EXPLORE_THRESHOLD,
    DEFAULT_TIMEOUT_SECS, REPORT_INTERVAL_SECS,
};

/// Runtime configuration, built once at startup and handed to every
/// component. The token is the only value with no usable default.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub base_url: String,
    pub explore_threshold: u32,
    /// Randomize the tie-break among equally ranked zones. Disabled for
    /// deterministic runs.
    pub randomize: bool,
    pub report_interval_secs: u64,
    pub boss_interval_secs: u64,
    pub backoff_secs: u64,
    pub timeout_secs: u64,
}

impl BotConfig {
    pub fn for_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            explore_threshold: DEFAULT_EXPLORE_THRESHOLD,
            randomize: true,
            report_interval_secs: REPORT_INTERVAL_SECS,
            boss_interval_secs: BOSS_INTERVAL_SECS,
            backoff_secs: BACKOFF_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub fn read_env_token(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
