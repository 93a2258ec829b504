use std::path::PathBuf;
use std::time::Duration;

use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Channel;
use tonic::transport::Endpoint;
use tonic::transport::Uri;
use tower::service_fn;
use tracing::debug;

use super::proto::agent_client;
use super::proto::ShootsRequest;
use crate::NetworkError;
use crate::Result;
use crate::ShootList;
use crate::SocketConfig;
use crate::SocketNetwork;

/// Client side of the `cloud_agent.Agent` service
#[derive(Debug, Clone)]
pub struct AgentClient {
    inner: agent_client::AgentClient<Channel>,
}

impl AgentClient {
    /// Connects to a running agent over the configured socket
    pub async fn connect(socket: &SocketConfig) -> Result<Self> {
        let channel = match socket.network {
            SocketNetwork::Tcp => {
                let address = socket.tcp_address()?;
                Endpoint::from_shared(format!("http://{address}"))?.connect().await?
            }
            SocketNetwork::Unix => {
                let path = PathBuf::from(&socket.address);
                // The URI is required by the endpoint but never dialed
                Endpoint::from_static("http://[::]:50051")
                    .connect_with_connector(service_fn(move |_: Uri| {
                        let path = path.clone();
                        async move { Ok::<_, std::io::Error>(TokioIo::new(UnixStream::connect(path).await?)) }
                    }))
                    .await?
            }
        };
        debug!("connected to {}:{}", socket.network, socket.address);

        Ok(Self {
            inner: agent_client::AgentClient::new(channel)
                .send_compressed(CompressionEncoding::Gzip)
                .accept_compressed(CompressionEncoding::Gzip),
        })
    }

    /// Reads the shoots of `source`, optionally narrowed to `created_by`.
    ///
    /// Unknown and unpopulated sources come back as
    /// [`Error::Query`](crate::Error::Query).
    pub async fn gardener_shoots(
        &mut self,
        source: &str,
        created_by: Option<&str>,
        timeout: Duration,
    ) -> Result<ShootList> {
        let mut request = tonic::Request::new(ShootsRequest {
            source: source.to_string(),
            created_by: created_by.map(str::to_string),
        });
        request.set_timeout(timeout);

        let response = tokio::time::timeout(timeout, self.inner.gardener_shoots(request))
            .await
            .map_err(|_| NetworkError::Timeout(timeout))??
            .into_inner();

        Ok(response.into_result(source)?)
    }
}
