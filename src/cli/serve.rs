use std::sync::Arc;

use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;

use super::resolve_config_path;
use super::ServeArgs;
use crate::metrics;
use crate::network;
use crate::AgentConfig;
use crate::Cache;
use crate::ConfigWatcher;
use crate::Error;
use crate::FileConfigSource;
use crate::FileUpstream;
use crate::InventoryService;
use crate::QueryServer;
use crate::Result;
use crate::ShootList;
use crate::Supervisor;
use crate::SystemError;

/// Runs the agent until SIGINT, SIGTERM or Ctrl+C
pub async fn serve(args: ServeArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config);
    let AgentConfig {
        server,
        watch: watch_config,
        monitoring,
        sources,
    } = AgentConfig::load(config_path.as_deref())?;

    info!(
        config = config_path.as_deref().unwrap_or("<defaults>"),
        sources = sources.len(),
        "starting cloud agent"
    );

    // Initializing Shutdown Signal
    let (graceful_tx, graceful_rx) = watch::channel(());

    if monitoring.prometheus_enabled {
        tokio::spawn(metrics::start_server(monitoring.prometheus_port, graceful_rx.clone()));
    }

    // Without a file there is nothing to watch; the closed feed keeps the
    // initial sources for the lifetime of the process
    let (_config_watcher, config_events) = match &config_path {
        Some(path) => {
            let (watcher, events) = ConfigWatcher::new(path)?;
            (Some(watcher), events)
        }
        None => {
            let (_, events) = mpsc::channel(1);
            (None, events)
        }
    };

    let cache: Arc<Cache<ShootList>> = Arc::new(Cache::new());
    let supervisor = Supervisor::new(
        cache.clone(),
        Arc::new(FileUpstream::new(watch_config.poll_interval())),
        Arc::new(FileConfigSource::new(config_path.clone())),
        watch_config.restart_delay(),
    );

    let shutdown = CancellationToken::new();
    let supervisor_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { supervisor.run(sources, config_events, shutdown).await })
    };

    // Listen on Shutdown Signal
    tokio::spawn(async move {
        if let Err(e) = graceful_shutdown(graceful_tx).await {
            error!("Failed to shutdown: {:?}", e);
        }
    });

    let service = InventoryService::new(QueryServer::new(cache));
    let served = network::start_rpc_server(service, &server, graceful_rx).await;
    if let Err(e) = &served {
        error!("rpc server stopped: {}", e);
    }

    shutdown.cancel();
    supervisor_task.await.map_err(SystemError::from)??;

    info!("cloud agent stopped");
    served
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    graceful_tx.send(()).map_err(|e| {
        error!("Failed to send shutdown signal: {}", e);
        Error::SignalSenderClosed(format!("Failed to send shutdown signal: {}", e))
    })?;

    info!("Shutdown signal sent");
    Ok(())
}
