//! Upstream inventory sources
//!
//! The supervisor only needs the capability "start watching source X, deliver
//! successive snapshots, tell me when the watch breaks". Any error yielded by
//! the stream, and the end of the stream itself, is treated as a broken watch
//! and retried.

mod file;
pub use file::*;


use futures::stream::BoxStream;
use tonic::async_trait;

use crate::SourceConfig;
use crate::Result;

/// Stream of full snapshots for one source
pub type SnapshotStream<T> = BoxStream<'static, Result<T>>;

#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    type Snapshot: Send + Sync + 'static;

    /// Establishes the watch for `source`.
    ///
    /// Returning `Ok` moves the source to `Watching`; dropping the returned
    /// stream must release every resource held by the watch.
    async fn watch(
        &self,
        source: &SourceConfig,
    ) -> Result<SnapshotStream<Self::Snapshot>>;
}
