//! Configuration management for the agent.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file (`-c` flag or `CLOUD_AGENT_CONFIG`)
//! - Environment variable overrides (`CLOUD_AGENT__SECTION__KEY`)
//! - Component-wise validation
//!
//! It also hosts the two configuration collaborators of the supervisor:
//! [`ConfigSource`], which reloads the list of sources, and
//! [`ConfigWatcher`], which signals that the backing file changed.

mod monitoring;
mod reload;
mod server;
mod source;
mod watch;
mod watcher;
pub use monitoring::*;
pub use reload::*;
pub use server::*;
pub use source::*;
pub use watch::*;
pub use watcher::*;

use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_PATH_ENV;
use crate::constants::ENV_PREFIX;
use crate::constants::ENV_SEPARATOR;
use crate::Result;

/// Main configuration container
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CLOUD_AGENT_CONFIG`
/// 3. Explicit override file (`with_override_config`)
/// 4. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AgentConfig {
    /// Socket the gRPC service listens on
    #[serde(default)]
    pub server: SocketConfig,
    /// Supervisor tuning
    #[serde(default)]
    pub watch: WatchConfig,
    /// Metrics endpoint
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Inventories to keep in the cache
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl Debug for AgentConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("server", &self.server)
            .field("sources", &self.sources.iter().map(|s| &s.name).collect::<Vec<_>>())
            .finish()
    }
}

impl AgentConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred so further overrides can be applied with
    /// `with_override_config()`. Callers MUST call `validate()` before using
    /// the configuration.
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.server.validate()?;
        self.watch.validate()?;
        self.monitoring.validate()?;
        validate_sources(&self.sources)?;
        Ok(self)
    }

    /// `new()` + optional override file + `validate()`
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = Self::new()?;
        let config = match path {
            Some(p) => config.with_override_config(p)?,
            None => config,
        };
        config.validate()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .ignore_empty(true)
        .try_parsing(true)
}
