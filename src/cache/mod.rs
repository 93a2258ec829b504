//! Live-state cache shared between the watch supervisor and the query path
//!
//! The cache maps a source name to a [`RegistrationHandle`], a single slot
//! holding the latest snapshot observed for that source.
//!
//! ```text
//!  Supervisor (one writer per source)        Query handlers (many readers)
//!          │                                          │
//!          │ register(name).set(snapshot)             │ get(name)?.get()
//!          ▼                                          ▼
//!   ┌──────────────────────── Cache<T> ─────────────────────────┐
//!   │  RwLock<HashMap<String, RegistrationHandle<T>>>           │
//!   │        │                                                   │
//!   │        └─► Registration { ArcSwapOption<T> }  (O(1) swap)  │
//!   └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Guarantees
//!
//! - At most one registration per name; concurrent `register` calls for the
//!   same name return handles to the same slot.
//! - `set` swaps a reference-counted pointer. Readers never observe a partially
//!   written snapshot, and a reader holding an old `Arc<T>` keeps a consistent
//!   old snapshot.
//! - `clean` removes every registration in one critical section. Handles taken
//!   before the call stay valid but are no longer reachable from the cache.

mod cache;
mod registration;


pub use cache::*;
pub use registration::*;
