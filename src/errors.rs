//! Agent Error Hierarchy
//!
//! Defines the error types shared by the cache, the watch supervisor, the
//! query path and the outer layers (configuration, network, CLI).

use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Infrastructure-level failures (network, upstream, io)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Typed, non-fatal answers of the query path
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),

    #[error("{0}")]
    SignalSenderClosed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Config watch error: {0}")]
    ConfigWatch(#[from] notify::Error),

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

/// Failures of the inventory source. All of them are retryable from the
/// supervisor's point of view.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Failed to read inventory at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode inventory of source {source_name}: {source}")]
    Decode {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Watch of source {0} terminated")]
    StreamClosed(String),

    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Malformed socket address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Unsupported socket network
    #[error("Unsupported network {0}, expected one of: unix, tcp")]
    UnsupportedNetwork(String),

    /// Failed to bind the listening socket
    #[error("Failed to bind {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Request did not complete in time
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// gRPC transport layer errors
    #[error(transparent)]
    TonicError(#[from] Box<tonic::transport::Error>),

    /// gRPC status code errors
    #[error(transparent)]
    TonicStatusError(#[from] Box<tonic::Status>),
}

/// Answers of the query path that are not a populated snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("source {0} is unknown")]
    UnknownSource(String),

    #[error("source {0} is not populated yet")]
    NotYetPopulated(String),
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::System(SystemError::Network(e))
    }
}

impl From<UpstreamError> for Error {
    fn from(e: UpstreamError) -> Self {
        Error::System(SystemError::Upstream(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::System(SystemError::Io(e))
    }
}

impl From<notify::Error> for Error {
    fn from(e: notify::Error) -> Self {
        Error::System(SystemError::ConfigWatch(e))
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(e: tonic::transport::Error) -> Self {
        NetworkError::TonicError(Box::new(e)).into()
    }
}

impl From<tonic::Status> for Error {
    fn from(e: tonic::Status) -> Self {
        NetworkError::TonicStatusError(Box::new(e)).into()
    }
}
