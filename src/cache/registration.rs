use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// The slot behind a handle. Not reachable outside this module so the only
/// way to touch the value is through [`RegistrationHandle::get`] and
/// [`RegistrationHandle::set`].
struct Registration<T> {
    name: String,
    value: ArcSwapOption<T>,
}

/// Opaque capability over one cache slot.
///
/// Cloning a handle is cheap and every clone refers to the same slot.
pub struct RegistrationHandle<T> {
    inner: Arc<Registration<T>>,
}

impl<T> RegistrationHandle<T> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Registration {
                name: name.into(),
                value: ArcSwapOption::empty(),
            }),
        }
    }

    /// Source name this slot is bound to
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Replaces the stored snapshot.
    ///
    /// Readers see either the previous snapshot or this one, never a mix.
    pub fn set(
        &self,
        value: T,
    ) {
        self.inner.value.store(Some(Arc::new(value)));
    }

    /// Returns the current snapshot, or `None` if the slot was never populated.
    ///
    /// Only the pointer is copied; the payload is shared.
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.value.load_full()
    }

    pub fn is_populated(&self) -> bool {
        self.inner.value.load().is_some()
    }

    /// Whether both handles refer to the same underlying slot
    pub fn same_slot(
        &self,
        other: &Self,
    ) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for RegistrationHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for RegistrationHandle<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("RegistrationHandle")
            .field("name", &self.inner.name)
            .field("populated", &self.is_populated())
            .finish()
    }
}
