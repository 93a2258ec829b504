// -
// Environment

/// Prefix of environment variables overriding configuration values
pub(crate) const ENV_PREFIX: &str = "CLOUD_AGENT";
/// Separator between nested keys in environment overrides
pub(crate) const ENV_SEPARATOR: &str = "__";
/// Environment variable pointing at the configuration file
pub const CONFIG_PATH_ENV: &str = "CLOUD_AGENT_CONFIG";

// -
// Defaults

pub const DEFAULT_CONFIG_PATH: &str = "cloud-agent.toml";
pub const DEFAULT_SOCKET_ADDRESS: &str = "/tmp/cloud-agent/agent.sock";

/// Annotation carrying the identity that created a shoot
pub(crate) const CREATED_BY_ANNOTATION: &str = "gardener.cloud/created-by";
