use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use tracing::debug;
use tracing::trace;

use super::RegistrationHandle;

/// Mapping from source name to its registration.
///
/// Constructed once at startup and shared through `Arc` between the watch
/// supervisor (writer) and the query server (reader).
pub struct Cache<T> {
    registrations: RwLock<HashMap<String, RegistrationHandle<T>>>,
}

impl<T> Cache<T> {
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the registration bound to `name`, creating an empty one if
    /// none exists yet.
    ///
    /// The first caller creates the slot, every later caller (concurrent or
    /// not) receives a handle to that same slot until [`Cache::clean`] or
    /// [`Cache::unregister`] removes it.
    pub fn register(
        &self,
        name: &str,
    ) -> RegistrationHandle<T> {
        // Fast path: most calls come from the supervisor on every update
        if let Some(handle) = self.registrations.read().get(name) {
            return handle.clone();
        }

        let mut registrations = self.registrations.write();
        registrations
            .entry(name.to_string())
            .or_insert_with(|| {
                trace!(source = name, "registration created");
                RegistrationHandle::new(name)
            })
            .clone()
    }

    /// Non-mutating lookup
    pub fn get(
        &self,
        name: &str,
    ) -> Option<RegistrationHandle<T>> {
        self.registrations.read().get(name).cloned()
    }

    /// Removes a single registration. Returns whether it existed.
    pub fn unregister(
        &self,
        name: &str,
    ) -> bool {
        self.registrations.write().remove(name).is_some()
    }

    /// Removes every registration at once.
    ///
    /// Handles obtained before this call keep pointing at their own (now
    /// orphaned) slot; lookups after it see an empty cache.
    pub fn clean(&self) {
        let removed = std::mem::take(&mut *self.registrations.write());
        debug!(removed = removed.len(), "cache cleaned");
    }

    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Registered source names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registrations.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Cache<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Cache").field("sources", &self.names()).finish()
    }
}
