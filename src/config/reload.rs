#[cfg(test)]
use mockall::automock;

use super::AgentConfig;
use super::SourceConfig;
use crate::Result;

/// Provides the current list of sources to watch.
///
/// Called by the supervisor once per "configuration changed" signal. An error
/// leaves the running watches untouched.
#[cfg_attr(test, automock)]
pub trait ConfigSource: Send + Sync + 'static {
    fn load(&self) -> Result<Vec<SourceConfig>>;
}

/// Re-reads the agent configuration file on every call
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: Option<String>,
}

impl FileConfigSource {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<Vec<SourceConfig>> {
        AgentConfig::load(self.path.as_deref()).map(|config| config.sources)
    }
}
