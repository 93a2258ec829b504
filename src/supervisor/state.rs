use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

/// Lifecycle of one source's watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WatchState {
    /// Establishing the upstream watch
    Starting = 0,
    /// Receiving snapshots
    Watching = 1,
    /// Watch broke; a restart follows
    Failed = 2,
    /// Loop exited after cancellation
    Stopped = 3,
}

impl From<u8> for WatchState {
    fn from(v: u8) -> Self {
        match v {
            0 => WatchState::Starting,
            1 => WatchState::Watching,
            2 => WatchState::Failed,
            _ => WatchState::Stopped,
        }
    }
}

/// Live counters of one source loop, shared with the supervisor
#[derive(Debug)]
pub(crate) struct SourceStatus {
    state: AtomicU8,
    restarts: AtomicU64,
    updates: AtomicU64,
}

impl SourceStatus {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(WatchState::Starting as u8),
            restarts: AtomicU64::new(0),
            updates: AtomicU64::new(0),
        }
    }

    pub(crate) fn transition(
        &self,
        state: WatchState,
    ) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn record_restart(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SourceReport {
        SourceReport {
            state: WatchState::from(self.state.load(Ordering::Acquire)),
            restarts: self.restarts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a source loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceReport {
    pub state: WatchState,
    /// Failed watches since the loop started
    pub restarts: u64,
    /// Snapshots written into the cache
    pub updates: u64,
}
