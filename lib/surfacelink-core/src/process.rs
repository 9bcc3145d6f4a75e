use crate::worker::WorkerThread;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

static PROCESS: ProcessInitFlag = ProcessInitFlag::new();

/// Process-scoped record of the one-time native initialization.
///
/// Set by the first activity creation that runs without saved state and never cleared; process
/// death is its only teardown. Also owns the worker thread that creation started, which is never
/// joined.
#[derive(Debug)]
pub struct ProcessInitFlag {
    initialized: AtomicBool,
    worker: OnceLock<WorkerThread>,
}

impl ProcessInitFlag {
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            worker: OnceLock::new(),
        }
    }

    /// The flag for this process.
    pub fn global() -> &'static ProcessInitFlag {
        &PROCESS
    }

    pub fn is_set(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Sets the flag. Returns `true` only for the one caller that moved it from unset to set.
    pub fn try_claim(&self) -> bool {
        self.initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn worker(&self) -> Option<&WorkerThread> {
        self.worker.get()
    }

    /// Parks the worker thread for the rest of the process. Hands it back if one is already parked.
    pub fn set_worker(&self, worker: WorkerThread) -> Result<(), WorkerThread> {
        self.worker.set(worker)
    }
}

impl Default for ProcessInitFlag {
    fn default() -> Self {
        Self::new()
    }
}
