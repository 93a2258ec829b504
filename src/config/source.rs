use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// One logical inventory source to watch
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Name clients query by; unique across the configuration
    pub name: String,

    /// Location of the Gardener `ShootList` JSON document
    pub path: PathBuf,

    /// Overrides `watch.poll_interval_ms` for this source
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

impl SourceConfig {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            poll_interval_ms: None,
        }
    }

    pub fn poll_interval(
        &self,
        default: Duration,
    ) -> Duration {
        self.poll_interval_ms.map(Duration::from_millis).unwrap_or(default)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "source name cannot be empty".into(),
            )));
        }

        if self.path.as_os_str().is_empty() {
            return Err(Error::Config(ConfigError::Message(format!(
                "source {} has an empty path",
                self.name
            ))));
        }

        if self.poll_interval_ms == Some(0) {
            return Err(Error::Config(ConfigError::Message(format!(
                "source {} poll_interval_ms must be greater than 0",
                self.name
            ))));
        }

        Ok(())
    }
}

/// Validates every source and rejects duplicate names, which would otherwise
/// put two watchers on one cache slot.
pub fn validate_sources(sources: &[SourceConfig]) -> Result<()> {
    let mut names = HashSet::new();
    for source in sources {
        source.validate()?;
        if !names.insert(source.name.as_str()) {
            return Err(Error::Config(ConfigError::Message(format!(
                "duplicate source name {}",
                source.name
            ))));
        }
    }
    Ok(())
}
