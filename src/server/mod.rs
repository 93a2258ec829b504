//! Read-only serving path over the cache
//!
//! A query takes one reference to the current snapshot and filters it
//! outside of any lock, so it never waits on the supervisor for longer than
//! the pointer load inside [`RegistrationHandle::get`](crate::RegistrationHandle::get).


use std::sync::Arc;

use tracing::trace;

use crate::Cache;
use crate::Filter;
use crate::QueryError;

pub struct QueryServer<T> {
    cache: Arc<Cache<T>>,
}

impl<T> Clone for QueryServer<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<T> QueryServer<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(cache: Arc<Cache<T>>) -> Self {
        Self { cache }
    }

    /// Returns the filtered snapshot of `source`.
    ///
    /// # Errors
    /// - [`QueryError::UnknownSource`] when no registration exists
    /// - [`QueryError::NotYetPopulated`] when the source never received a
    ///   snapshot
    pub fn query<F>(
        &self,
        source: &str,
        filter: &F,
    ) -> std::result::Result<T, QueryError>
    where
        F: Filter<T> + ?Sized,
    {
        let snapshot = self.snapshot(source)?;
        trace!(source, "snapshot taken");
        Ok(filter.apply(&snapshot))
    }

    /// Current snapshot of `source` without filtering
    pub fn snapshot(
        &self,
        source: &str,
    ) -> std::result::Result<Arc<T>, QueryError> {
        let registration = self
            .cache
            .get(source)
            .ok_or_else(|| QueryError::UnknownSource(source.to_string()))?;

        registration
            .get()
            .ok_or_else(|| QueryError::NotYetPopulated(source.to_string()))
    }

    /// Sources currently known to the cache
    pub fn sources(&self) -> Vec<String> {
        self.cache.names()
    }
}
