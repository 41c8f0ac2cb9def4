// src/pipeline/gate.rs

//! Single-slot admission for pipeline runs.
//!
//! ```text
//! Idle --try_acquire()--> Processing --drop(RunPermit)--> Idle
//! ```
//!
//! Admission is one compare-and-set, so two candidates racing for the slot
//! can never both win. Release happens in `Drop`, so it runs whatever the
//! run's outcome was.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Shared admission gate. Cloning yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct RunGate {
    busy: Arc<AtomicBool>,
}

impl RunGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a permit is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the slot, or `None` if a run is already in progress.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| {
                debug!("run gate: idle -> processing");
                RunPermit {
                    busy: Arc::clone(&self.busy),
                }
            })
    }
}

/// Proof of holding the gate. Dropping it reopens the gate.
#[derive(Debug)]
pub struct RunPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        debug!("run gate: processing -> idle");
    }
}
