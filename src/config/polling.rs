//! Refresh and outcome-reset timings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between status polls
    pub status_interval_seconds: u64,
    /// Seconds between chat history reloads on the moderation view
    pub chat_interval_seconds: u64,
    /// How long a success/failure indicator stays up after a mutation
    pub outcome_reset_millis: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_seconds: 5,
            chat_interval_seconds: 5,
            outcome_reset_millis: 3000,
        }
    }
}

impl PollingConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_seconds)
    }

    pub fn chat_interval(&self) -> Duration {
        Duration::from_secs(self.chat_interval_seconds)
    }

    pub fn outcome_reset(&self) -> Duration {
        Duration::from_millis(self.outcome_reset_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_config_defaults() {
        let config = PollingConfig::default();
        assert_eq!(config.status_interval(), Duration::from_secs(5));
        assert_eq!(config.outcome_reset(), Duration::from_millis(3000));
    }
}
