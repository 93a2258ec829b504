use std::io::Write;

use chrono::Utc;
use tracing::debug;

use super::resolve_config_path;
use super::StateArgs;
use crate::AgentClient;
use crate::AgentConfig;
use crate::Error;
use crate::NetworkError;
use crate::Result;
use crate::ShootList;

/// Queries the running agent and prints the outcome with `args.output`.
///
/// Only configuration and output failures are returned; anything that went
/// wrong talking to the agent is printed through the error format.
pub async fn state<W: Write>(
    args: StateArgs,
    out: &mut W,
) -> Result<()> {
    let config = AgentConfig::load(resolve_config_path(args.config.clone()).as_deref())?;

    let source = args
        .source
        .clone()
        .or_else(|| config.sources.first().map(|s| s.name.clone()));

    let result = match source {
        Some(source) => fetch(&args, &config, &source).await,
        None => Err(Error::Fatal("no source given and none configured".to_string())),
    };
    if let Err(e) = &result {
        debug!("query failed: {}", e);
    }

    writeln!(out, "{}", args.output.render(&result, Utc::now()))?;
    Ok(())
}

async fn fetch(
    args: &StateArgs,
    config: &AgentConfig,
    source: &str,
) -> Result<ShootList> {
    let mut client = tokio::time::timeout(args.timeout, AgentClient::connect(&config.server))
        .await
        .map_err(|_| NetworkError::Timeout(args.timeout))??;

    client
        .gardener_shoots(source, args.created_by.as_deref(), args.timeout)
        .await
}
