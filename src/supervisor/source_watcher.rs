use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::SourceStatus;
use super::WatchState;
use crate::metrics::SNAPSHOT_UPDATES;
use crate::metrics::WATCH_RESTARTS;
use crate::upstream::Upstream;
use crate::Cache;
use crate::Error;
use crate::SourceConfig;
use crate::UpstreamError;

/// Restart-on-failure loop for a single source
pub(crate) struct SourceWatcher<U: Upstream> {
    pub(crate) source: SourceConfig,
    pub(crate) cache: Arc<Cache<U::Snapshot>>,
    pub(crate) upstream: Arc<U>,
    pub(crate) status: Arc<SourceStatus>,
    pub(crate) restart_delay: Duration,
}

impl<U: Upstream> SourceWatcher<U> {
    /// Runs until `cancel` fires. Every failure is followed by a restart.
    pub(crate) async fn run(
        self,
        cancel: CancellationToken,
    ) {
        let name = self.source.name.as_str();

        // Known from now on, populated after the first snapshot
        self.cache.register(name);

        loop {
            self.status.transition(WatchState::Starting);
            debug!(source = name, "starting watch");

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                attempt = self.upstream.watch(&self.source) => attempt,
            };

            let failure: Error = match attempt {
                Ok(mut snapshots) => {
                    self.status.transition(WatchState::Watching);
                    info!(source = name, "watch established");

                    loop {
                        let next = tokio::select! {
                            biased;
                            // Dropping the stream releases the upstream connection
                            _ = cancel.cancelled() => {
                                self.status.transition(WatchState::Stopped);
                                return;
                            }
                            next = snapshots.next() => next,
                        };

                        match next {
                            Some(Ok(snapshot)) => {
                                self.cache.register(name).set(snapshot);
                                self.status.record_update();
                                SNAPSHOT_UPDATES.with_label_values(&[name]).inc();
                            }
                            Some(Err(e)) => break e,
                            None => break UpstreamError::StreamClosed(name.to_string()).into(),
                        }
                    }
                }
                Err(e) => e,
            };

            self.status.transition(WatchState::Failed);
            self.status.record_restart();
            WATCH_RESTARTS.with_label_values(&[name]).inc();
            warn!(source = name, error = %failure, "watch failed, restarting");

            if self.restart_delay.is_zero() {
                tokio::task::yield_now().await;
                continue;
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(self.restart_delay) => {}
            }
        }

        self.status.transition(WatchState::Stopped);
        debug!(source = name, "watch loop stopped");
    }
}
