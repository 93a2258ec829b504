use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::source_watcher::SourceWatcher;
use super::SourceReport;
use super::SourceStatus;
use crate::metrics::CACHE_RESETS;
use crate::metrics::WATCHED_SOURCES;
use crate::upstream::Upstream;
use crate::Cache;
use crate::ConfigSource;
use crate::Result;
use crate::SourceConfig;

/// Drives one watch loop per configured source and resets everything when
/// the configuration changes.
pub struct Supervisor<U: Upstream> {
    cache: Arc<Cache<U::Snapshot>>,
    upstream: Arc<U>,
    config_source: Arc<dyn ConfigSource>,
    restart_delay: Duration,
    statuses: DashMap<String, Arc<SourceStatus>>,
    resets: AtomicU64,
}

enum Signal {
    Shutdown,
    Changed,
    FeedClosed,
}

/// Loops of one configuration generation
struct Generation {
    token: CancellationToken,
    watchers: HashMap<String, JoinHandle<()>>,
}

impl<U: Upstream> Supervisor<U> {
    pub fn new(
        cache: Arc<Cache<U::Snapshot>>,
        upstream: Arc<U>,
        config_source: Arc<dyn ConfigSource>,
        restart_delay: Duration,
    ) -> Self {
        Self {
            cache,
            upstream,
            config_source,
            restart_delay,
            statuses: DashMap::new(),
            resets: AtomicU64::new(0),
        }
    }

    /// Status of the loop watching `source`, if one runs in the current
    /// generation
    pub fn status(
        &self,
        source: &str,
    ) -> Option<SourceReport> {
        self.statuses.get(source).map(|s| s.snapshot())
    }

    /// Number of full resets performed after configuration changes
    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::Acquire)
    }

    /// Runs until `shutdown` is cancelled.
    ///
    /// Each signal received on `config_events` reloads the sources through the
    /// [`ConfigSource`]. A successful reload stops every loop, cleans the cache
    /// and starts over with the new sources. A failed reload is logged and the
    /// running loops are kept.
    pub async fn run(
        &self,
        initial: Vec<SourceConfig>,
        mut config_events: mpsc::Receiver<()>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let mut sources = initial;
        let mut events_open = true;

        loop {
            let generation = self.spawn_generation(&sources, &shutdown);

            let next = loop {
                let signal = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => Signal::Shutdown,
                    event = config_events.recv(), if events_open => match event {
                        Some(()) => Signal::Changed,
                        None => Signal::FeedClosed,
                    },
                };

                match signal {
                    Signal::Shutdown => {
                        info!("shutdown requested, stopping watches");
                        self.stop_generation(generation).await;
                        return Ok(());
                    }
                    Signal::FeedClosed => {
                        // Keep watching with the current configuration until shutdown
                        warn!("configuration change feed closed");
                        events_open = false;
                    }
                    Signal::Changed => match self.config_source.load() {
                        Ok(sources) => break sources,
                        Err(e) => {
                            error!(
                                "configuration reload failed, keeping last known good configuration: {}",
                                e
                            );
                        }
                    },
                }
            };

            info!("configuration modification detected");
            self.stop_generation(generation).await;

            info!("cleaning up cache");
            self.cache.clean();
            self.statuses.clear();
            self.resets.fetch_add(1, Ordering::AcqRel);
            CACHE_RESETS.with_label_values(&["config_changed"]).inc();

            sources = next;
        }
    }

    fn spawn_generation(
        &self,
        sources: &[SourceConfig],
        shutdown: &CancellationToken,
    ) -> Generation {
        let token = shutdown.child_token();
        let mut watchers = HashMap::with_capacity(sources.len());

        for source in sources {
            // One loop per name, even if validation was bypassed
            if watchers.contains_key(&source.name) {
                warn!(source = %source.name, "duplicate source ignored");
                continue;
            }

            let status = Arc::new(SourceStatus::new());
            self.statuses.insert(source.name.clone(), status.clone());

            let watcher = SourceWatcher {
                source: source.clone(),
                cache: self.cache.clone(),
                upstream: self.upstream.clone(),
                status,
                restart_delay: self.restart_delay,
            };
            let handle = tokio::spawn(watcher.run(token.clone()));
            watchers.insert(source.name.clone(), handle);
        }

        WATCHED_SOURCES.set(watchers.len() as i64);
        info!(sources = watchers.len(), "watches started");

        Generation { token, watchers }
    }

    /// Cancels the loops and waits for them, so upstream connections are
    /// released before the cache is touched.
    async fn stop_generation(
        &self,
        generation: Generation,
    ) {
        generation.token.cancel();
        for (name, handle) in generation.watchers {
            if let Err(e) = handle.await {
                error!(source = %name, "watch loop terminated abnormally: {:?}", e);
            }
        }
        WATCHED_SOURCES.set(0);
        debug!("watches stopped");
    }
}
