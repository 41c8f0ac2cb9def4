// src/engine/mod.rs

//! Runtime engine for storyboard.
//!
//! This module ties together:
//! - events from the file watcher and Ctrl-C ([`RuntimeEvent`])
//! - the per-candidate handler that settles, admits, runs and relocates a
//!   project ([`handler`])
//! - the async event loop that dispatches candidates ([`runtime`])

use std::path::PathBuf;

use crate::pipeline::ProcessOutcome;

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A project input file was created inside `project_dir`.
    InputCreated { project_dir: PathBuf },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// What the handler did with one candidate.
#[derive(Debug)]
pub enum CandidateOutcome {
    /// A run was already in progress; the event was dropped.
    Busy,
    /// The directory did not hold both inputs.
    Incomplete,
    /// The inputs never stopped changing.
    Unstable,
    /// Another candidate claimed the run slot first.
    LostRace,
    /// The project ran (successfully or not) and was relocated if possible.
    Processed(ProcessOutcome),
}

pub mod handler;
pub mod runtime;

pub use handler::handle_candidate;
pub use runtime::Runtime;
