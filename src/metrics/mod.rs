use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use warp::Filter;
use warp::Rejection;
use warp::Reply;


lazy_static! {
    pub static ref WATCH_RESTARTS: IntCounterVec = IntCounterVec::new(
        Opts::new("watch_restarts", "Failed upstream watches that were restarted"),
        &["source"]
    )
    .expect("metric can not be created");

    pub static ref SNAPSHOT_UPDATES: IntCounterVec = IntCounterVec::new(
        Opts::new("snapshot_updates", "Snapshots written into the cache"),
        &["source"]
    )
    .expect("metric can not be created");

    pub static ref QUERY_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("query_requests", "Inventory queries by outcome"),
        &["status"]
    )
    .expect("metric can not be created");

    pub static ref CACHE_RESETS: IntCounterVec = IntCounterVec::new(
        Opts::new("cache_resets", "Full cache resets triggered by configuration changes"),
        &["reason"]
    )
    .expect("metric can not be created");

    pub static ref WATCHED_SOURCES: IntGauge =
        IntGauge::new("watched_sources", "Sources with an active supervisor loop")
            .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

pub(crate) fn register_custom_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(WATCH_RESTARTS.clone()),
        Box::new(SNAPSHOT_UPDATES.clone()),
        Box::new(QUERY_REQUESTS.clone()),
        Box::new(CACHE_RESETS.clone()),
        Box::new(WATCHED_SOURCES.clone()),
    ];
    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            error!("collector can not be registered: {}", e);
        }
    }
}

/// Serves `/metrics` until the shutdown signal fires
pub async fn start_server(
    port: u16,
    mut shutdown_signal: watch::Receiver<()>,
) {
    REGISTER.call_once(|| register_custom_metrics(&REGISTRY));

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    info!("metrics server listening on port {}", port);
    let (_, server) =
        warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
            let _ = shutdown_signal.changed().await;
        });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    Ok(gather_text(&REGISTRY))
}

/// Text exposition of every collector in `registry`
pub(crate) fn gather_text(registry: &Registry) -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_else(|e| {
        error!("custom metrics could not be from_utf8'd: {}", e);
        String::default()
    })
}
