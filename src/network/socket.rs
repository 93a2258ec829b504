//! Listening socket and RPC server start-up

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use futures::FutureExt;
use futures::Stream;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::net::TcpListener;
use tokio::net::UnixListener;
use tokio::sync::watch;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::wrappers::UnixListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::server::Connected;
use tonic_health::server::health_reporter;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::proto::agent_server::AgentServer;
use super::InventoryService;
use crate::NetworkError;
use crate::Result;
use crate::SocketConfig;
use crate::SocketNetwork;

/// A bound, not yet serving, socket
#[derive(Debug)]
pub enum Listener {
    Unix { listener: UnixListener, path: PathBuf },
    Tcp(TcpListener),
}

impl Listener {
    /// Binds the configured socket.
    ///
    /// For `unix` the parent directory is created and a stale socket file
    /// left by a previous run is removed first.
    pub async fn bind(socket: &SocketConfig) -> Result<Self> {
        match socket.network {
            SocketNetwork::Unix => {
                let path = PathBuf::from(&socket.address);
                prepare_socket_path(&path).await?;
                let listener = UnixListener::bind(&path).map_err(|source| NetworkError::Bind {
                    address: socket.address.clone(),
                    source,
                })?;
                Ok(Listener::Unix { listener, path })
            }
            SocketNetwork::Tcp => {
                let address = socket.tcp_address()?;
                let listener = TcpListener::bind(address).await.map_err(|source| NetworkError::Bind {
                    address: socket.address.clone(),
                    source,
                })?;
                Ok(Listener::Tcp(listener))
            }
        }
    }

    /// Address clients should dial; resolves port 0 for `tcp`
    pub fn local_socket(&self) -> Result<SocketConfig> {
        match self {
            Listener::Unix { path, .. } => Ok(SocketConfig::unix(path.to_string_lossy())),
            Listener::Tcp(listener) => Ok(SocketConfig::tcp(listener.local_addr()?)),
        }
    }
}

async fn prepare_socket_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            warn!("removed stale socket {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Binds `socket` and serves the agent until `shutdown_signal` fires
pub async fn start_rpc_server(
    service: InventoryService,
    socket: &SocketConfig,
    shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    let listener = Listener::bind(socket).await?;
    serve(service, listener, shutdown_signal).await
}

/// Serves the agent on an already bound listener
pub async fn serve(
    service: InventoryService,
    listener: Listener,
    shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    match listener {
        Listener::Unix { listener, path } => {
            info!("rpc server listening on unix:{}", path.display());
            let result = serve_incoming(service, UnixListenerStream::new(listener), shutdown_signal).await;
            if let Err(e) = tokio::fs::remove_file(&path).await {
                debug!("socket {} not removed: {}", path.display(), e);
            }
            result
        }
        Listener::Tcp(listener) => {
            info!("rpc server listening on tcp:{}", listener.local_addr()?);
            serve_incoming(service, TcpListenerStream::new(listener), shutdown_signal).await
        }
    }
}

async fn serve_incoming<I, IO, IE>(
    service: InventoryService,
    incoming: I,
    mut shutdown_signal: watch::Receiver<()>,
) -> Result<()>
where
    I: Stream<Item = std::result::Result<IO, IE>>,
    IO: AsyncRead + AsyncWrite + Connected + Unpin + Send + 'static,
    IO::ConnectInfo: Clone + Send + Sync + 'static,
    IE: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (mut health_reporter, health_service) = health_reporter();
    health_reporter.set_serving::<AgentServer<InventoryService>>().await;

    if let Err(e) = tonic::transport::Server::builder()
        .add_service(health_service)
        .add_service(
            AgentServer::new(service)
                .accept_compressed(CompressionEncoding::Gzip)
                .send_compressed(CompressionEncoding::Gzip),
        )
        .serve_with_incoming_shutdown(
            incoming,
            shutdown_signal.changed().map(|_| {
                warn!("stopping rpc server");
            }),
        )
        .await
    {
        error!("rpc server failed: {:?}", e);
        return Err(e.into());
    }

    debug!("rpc service finished");
    Ok(())
}
