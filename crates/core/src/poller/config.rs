//! Poller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the payment status poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Time between status queries (milliseconds).
    /// The first query happens one interval after the session is created.
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

fn default_interval() -> u64 {
    5000 // 5 seconds
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
        }
    }
}
