use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Supervisor tuning
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Pause between a failed watch and the next attempt. 0 restarts immediately.
    ///
    /// Default: 500
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    /// Poll period of sources that do not set their own
    ///
    /// Default: 30000
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: default_restart_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WatchConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "watch.poll_interval_ms must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

fn default_restart_delay_ms() -> u64 {
    500
}
fn default_poll_interval_ms() -> u64 {
    30_000
}
