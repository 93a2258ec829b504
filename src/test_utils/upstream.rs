use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use futures::stream;
use futures::StreamExt;
use parking_lot::Mutex;
use tonic::async_trait;

use crate::upstream::SnapshotStream;
use crate::upstream::Upstream;
use crate::Result;
use crate::SourceConfig;
use crate::UpstreamError;

/// One scripted answer of [`ScriptedUpstream::watch`]
pub enum Step<T> {
    /// `watch` itself fails
    FailConnect,
    /// The stream yields the items and then ends
    Finite(Vec<Result<T>>),
    /// The stream yields the snapshots and then stays open forever
    Hold(Vec<T>),
}

/// Counts dropped streams, i.e. released upstream connections
struct ReleaseGuard(Arc<AtomicUsize>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Upstream replaying a per-source script. Once a source's script is
/// exhausted every further watch holds an empty, never-ending stream.
pub struct ScriptedUpstream<T> {
    scripts: Mutex<HashMap<String, VecDeque<Step<T>>>>,
    attempts: Mutex<HashMap<String, usize>>,
    active: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl<T> ScriptedUpstream<T> {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            attempts: Mutex::new(HashMap::new()),
            active: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn script(
        self,
        source: &str,
        steps: Vec<Step<T>>,
    ) -> Self {
        self.scripts.lock().insert(source.to_string(), steps.into());
        self
    }

    /// Number of `watch` calls made for `source`
    pub fn attempts(
        &self,
        source: &str,
    ) -> usize {
        self.attempts.lock().get(source).copied().unwrap_or(0)
    }

    /// Streams handed out and not dropped yet
    pub fn open_streams(&self) -> usize {
        self.active.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T> Upstream for ScriptedUpstream<T>
where
    T: Send + Sync + 'static,
{
    type Snapshot = T;

    async fn watch(
        &self,
        source: &SourceConfig,
    ) -> Result<SnapshotStream<T>> {
        *self.attempts.lock().entry(source.name.clone()).or_insert(0) += 1;

        let step = self
            .scripts
            .lock()
            .get_mut(&source.name)
            .and_then(|steps| steps.pop_front())
            .unwrap_or(Step::Hold(Vec::new()));

        let items: Vec<Result<T>> = match step {
            Step::FailConnect => {
                return Err(UpstreamError::Unavailable(format!("{} unreachable", source.name)).into());
            }
            Step::Finite(items) => {
                self.active.fetch_add(1, Ordering::SeqCst);
                let guard = ReleaseGuard(self.released.clone());
                return Ok(stream::iter(items)
                    .map(move |item| {
                        let _ = &guard;
                        item
                    })
                    .boxed());
            }
            Step::Hold(items) => items.into_iter().map(Ok).collect(),
        };

        self.active.fetch_add(1, Ordering::SeqCst);
        let guard = ReleaseGuard(self.released.clone());
        Ok(stream::iter(items)
            .chain(stream::pending())
            .map(move |item| {
                let _ = &guard;
                item
            })
            .boxed())
    }
}
