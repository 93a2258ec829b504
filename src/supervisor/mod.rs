//! Watch supervisor
//!
//! Keeps one restart-on-failure loop per configured source and is the only
//! writer of the cache.
//!
//! ```text
//!                 ┌───────────── configuration changed ─────────────┐
//!                 ▼                                                 │
//!   ┌──────────────────────────┐  cancel generation, join loops,    │
//!   │ Supervisor::run          │  Cache::clean(), respawn ──────────┘
//!   └──────────┬───────────────┘
//!              │ one task per source
//!              ▼
//!   Starting ──watch ok──► Watching ──error / end of stream──► Failed
//!      ▲                                                         │
//!      └──────────────── restart (optional delay) ───────────────┘
//! ```
//!
//! Upstream failures never leave this module: they are logged, counted and
//! retried forever. The loops stop only when the shutdown token is cancelled
//! or when a configuration reload replaces them.

mod source_watcher;
mod state;
mod supervisor;


pub use state::*;
pub use supervisor::*;
