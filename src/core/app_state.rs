use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// At-most-one-run flag owned by the simulator
#[derive(Debug, Default)]
pub struct RunFlag {
    running: AtomicBool,
}

impl RunFlag {
    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::Acquire) { RunState::Running } else { RunState::Idle }
    }

    /// Moves Idle -> Running; `None` if a run is already active
    pub fn try_acquire(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard { flag: self })
    }
}

/// Returns the flag to Idle when the run finishes or its future is dropped
#[derive(Debug)]
pub struct RunGuard<'a> {
    flag: &'a RunFlag,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.running.store(false, Ordering::Release);
    }
}

/// ISP display label, written once by the startup lookup
pub type SharedIspLabel = Arc<RwLock<String>>;

pub fn shared_isp_label(initial: impl Into<String>) -> SharedIspLabel {
    Arc::new(RwLock::new(initial.into()))
}
