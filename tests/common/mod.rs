use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cloud_agent::network::serve;
use cloud_agent::AgentClient;
use cloud_agent::Cache;
use cloud_agent::ConfigSource;
use cloud_agent::FileUpstream;
use cloud_agent::InventoryService;
use cloud_agent::Listener;
use cloud_agent::QueryServer;
use cloud_agent::Result;
use cloud_agent::ShootList;
use cloud_agent::SocketConfig;
use cloud_agent::SourceConfig;
use cloud_agent::Supervisor;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const WAIT: Duration = Duration::from_secs(10);
pub const POLL: Duration = Duration::from_millis(50);

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    once_cell::sync::Lazy::force(&LOGGER_INIT);
}

/// Writes a Gardener `ShootList` with one shoot per `(name, created_by)`
pub fn write_inventory(
    path: &Path,
    entries: &[(&str, &str)],
) {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(name, owner)| {
            serde_json::json!({
                "metadata": {
                    "name": name,
                    "namespace": "garden-dev",
                    "creationTimestamp": "2024-01-01T00:00:00Z",
                    "annotations": { "gardener.cloud/created-by": owner }
                },
                "spec": { "region": "eu-west-1" },
                "status": { "conditions": [ { "type": "EveryNodeReady", "status": "True" } ] }
            })
        })
        .collect();
    // Write then rename so pollers never see a partial document
    let staging = path.with_extension("tmp");
    std::fs::write(&staging, serde_json::to_vec(&serde_json::json!({ "items": items })).unwrap()).unwrap();
    std::fs::rename(&staging, path).unwrap();
}

/// A running agent listening on an ephemeral tcp port
pub struct Agent {
    pub cache: Arc<Cache<ShootList>>,
    pub supervisor: Arc<Supervisor<FileUpstream>>,
    pub socket: SocketConfig,
    pub config_events: mpsc::Sender<()>,
    shutdown: CancellationToken,
    graceful_tx: watch::Sender<()>,
    supervisor_task: JoinHandle<Result<()>>,
    server_task: JoinHandle<Result<()>>,
}

impl Agent {
    pub async fn start(
        sources: Vec<SourceConfig>,
        config_source: Arc<dyn ConfigSource>,
    ) -> Self {
        enable_logger();
        let cache = Arc::new(Cache::new());
        let supervisor = Arc::new(Supervisor::new(
            cache.clone(),
            Arc::new(FileUpstream::new(POLL)),
            config_source,
            Duration::from_millis(20),
        ));

        let (config_events, events_rx) = mpsc::channel(1);
        let shutdown = CancellationToken::new();
        let supervisor_task = {
            let supervisor = supervisor.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move { supervisor.run(sources, events_rx, shutdown).await })
        };

        let listener = Listener::bind(&SocketConfig::tcp("127.0.0.1:0".parse().unwrap()))
            .await
            .unwrap();
        let socket = listener.local_socket().unwrap();
        let (graceful_tx, graceful_rx) = watch::channel(());
        let server_task = tokio::spawn(serve(
            InventoryService::new(QueryServer::new(cache.clone())),
            listener,
            graceful_rx,
        ));

        Self {
            cache,
            supervisor,
            socket,
            config_events,
            shutdown,
            graceful_tx,
            supervisor_task,
            server_task,
        }
    }

    pub async fn client(&self) -> AgentClient {
        within(AgentClient::connect(&self.socket)).await.unwrap()
    }

    pub async fn stop(self) {
        self.graceful_tx.send(()).unwrap();
        within(self.server_task).await.unwrap().unwrap();
        self.shutdown.cancel();
        within(self.supervisor_task).await.unwrap().unwrap();
    }
}

pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(WAIT, future)
        .await
        .unwrap_or_else(|_| panic!("future did not complete within {:?}", WAIT))
}

/// Retries `probe` until it returns `Some`
pub async fn eventually<T, F, Fut>(mut probe: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    within(async {
        loop {
            if let Some(value) = probe().await {
                return value;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
}
