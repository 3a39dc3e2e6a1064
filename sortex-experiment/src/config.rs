use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long feedback stays up before the next trial (or the results)
    pub feedback_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 1000,
        }
    }
}

impl SessionConfig {
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}
