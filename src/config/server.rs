use std::fmt;
use std::net::SocketAddr;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_SOCKET_ADDRESS;
use crate::Error;
use crate::Result;

/// Transport the agent listens on
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocketNetwork {
    Unix,
    Tcp,
}

impl fmt::Display for SocketNetwork {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            SocketNetwork::Unix => write!(f, "unix"),
            SocketNetwork::Tcp => write!(f, "tcp"),
        }
    }
}

/// Socket shared by the server (`serve`) and the client (`state`)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SocketConfig {
    /// Default: unix
    #[serde(default = "default_network")]
    pub network: SocketNetwork,

    /// Socket file path for `unix`, `IP:PORT` for `tcp`
    ///
    /// Default: /tmp/cloud-agent/agent.sock
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            address: default_address(),
        }
    }
}

impl SocketConfig {
    pub fn unix(path: impl Into<String>) -> Self {
        Self {
            network: SocketNetwork::Unix,
            address: path.into(),
        }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self {
            network: SocketNetwork::Tcp,
            address: addr.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "server.address cannot be empty".into(),
            )));
        }

        if self.network == SocketNetwork::Tcp {
            self.tcp_address()?;
        }

        Ok(())
    }

    /// Parses the address of a `tcp` socket
    pub fn tcp_address(&self) -> Result<SocketAddr> {
        self.address.parse().map_err(|e| {
            Error::Config(ConfigError::Message(format!(
                "server.address {} is not a valid IP:PORT: {e}",
                self.address
            )))
        })
    }
}

fn default_network() -> SocketNetwork {
    SocketNetwork::Unix
}
fn default_address() -> String {
    DEFAULT_SOCKET_ADDRESS.to_string()
}
