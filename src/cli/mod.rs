//! Command line entry points
//!
//! - `serve` runs the agent: supervisor, config watcher, metrics and the RPC
//!   socket
//! - `state` asks a running agent for the shoots of one source and prints them

mod serve;
mod state;

pub use serve::*;
pub use state::*;


use std::path::Path;
use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::constants::CONFIG_PATH_ENV;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::output::OutputFormat;
use crate::Result;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Keeps a live view of your Gardener shoots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch the configured sources and serve them on the agent socket
    Serve(ServeArgs),
    /// Print the shoots of a source known to the running agent
    State(StateArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Configuration file, watched for changes
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StateArgs {
    /// Source to read; defaults to the first configured source
    #[arg(short, long)]
    pub source: Option<String>,

    /// Only shoots created by this identity
    #[arg(long, alias = "createdBy")]
    pub created_by: Option<String>,

    /// type[=format[=error_format]] with type one of text, table, json
    #[arg(short, long, default_value = "table")]
    pub output: OutputFormat,

    /// Request timeout, e.g. 500ms, 2s or 1m30s
    #[arg(short, long, default_value = "2s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Configuration file naming the agent socket
    #[arg(short, long)]
    pub config: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve(args).await,
            Commands::State(args) => state(args, &mut std::io::stdout()).await,
        }
    }
}

/// Configuration file to use: the flag, then `CLOUD_AGENT_CONFIG`, then
/// `cloud-agent.toml` when it exists.
pub fn resolve_config_path(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .or_else(|| Path::new(DEFAULT_CONFIG_PATH).exists().then(|| DEFAULT_CONFIG_PATH.to_string()))
}

/// Parses durations such as `500ms`, `2s` or `1m30s`
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| format!("invalid duration '{s}', use formats like '500ms', '2s' or '1m30s': {e}"))
}
