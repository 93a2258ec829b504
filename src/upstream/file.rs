use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use futures::stream;
use futures::StreamExt;
use tokio::time::interval_at;
use tokio::time::Instant;
use tokio::time::Interval;
use tokio::time::MissedTickBehavior;
use tonic::async_trait;
use tracing::trace;

use super::SnapshotStream;
use super::Upstream;
use crate::GardenerShootList;
use crate::Result;
use crate::ShootList;
use crate::SourceConfig;
use crate::UpstreamError;

/// Polls a Gardener `ShootList` JSON document on disk.
///
/// The watch is established once the document can be read and decoded; the
/// stream then yields that first snapshot immediately and a fresh one every
/// poll interval. A read or decode failure ends the watch.
#[derive(Debug, Clone)]
pub struct FileUpstream {
    default_poll_interval: Duration,
}

impl FileUpstream {
    pub fn new(default_poll_interval: Duration) -> Self {
        Self {
            default_poll_interval,
        }
    }
}

struct PollState {
    name: String,
    path: PathBuf,
    ticker: Interval,
    pending: Option<ShootList>,
}

#[async_trait]
impl Upstream for FileUpstream {
    type Snapshot = ShootList;

    async fn watch(
        &self,
        source: &SourceConfig,
    ) -> Result<SnapshotStream<ShootList>> {
        let initial = read_inventory(&source.name, &source.path).await?;

        let period = source.poll_interval(self.default_poll_interval);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let state = PollState {
            name: source.name.clone(),
            path: source.path.clone(),
            ticker,
            pending: Some(initial),
        };

        let snapshots = stream::unfold(state, |mut state| async move {
            if let Some(snapshot) = state.pending.take() {
                return Some((Ok(snapshot), state));
            }

            state.ticker.tick().await;
            let snapshot = read_inventory(&state.name, &state.path).await;
            Some((snapshot, state))
        });

        Ok(snapshots.boxed())
    }
}

/// Reads and decodes one inventory document
pub async fn read_inventory(
    name: &str,
    path: &Path,
) -> Result<ShootList> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => UpstreamError::Unavailable(format!(
            "no inventory for source {name} at {}",
            path.display()
        )),
        _ => UpstreamError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let raw: GardenerShootList = serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
        source_name: name.to_string(),
        source: e,
    })?;

    trace!(source = name, shoots = raw.items.len(), "inventory read");
    Ok(ShootList::from(raw))
}
