// src/engine/handler.rs

//! Handling of a single candidate project directory.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::engine::CandidateOutcome;
use crate::pipeline::Pipeline;
use crate::types::Project;
use crate::watch::{SettleOutcome, SettlePolicy, settle_project};

/// Decide whether `dir` should run, and run it if so.
///
/// 1. Drop the candidate if a run is already in progress (runs are never
///    queued).
/// 2. Wait for the inputs to settle.
/// 3. Claim the run slot; losing the race drops the candidate.
/// 4. Re-check the inputs under the permit, since a finished run may have
///    moved the directory in the meantime.
/// 5. Run and relocate via [`Pipeline::process`].
pub async fn handle_candidate(
    pipeline: &Pipeline,
    policy: &SettlePolicy,
    dir: &Path,
) -> CandidateOutcome {
    if pipeline.is_busy() {
        debug!(dir = ?dir, "pipeline busy; ignoring candidate");
        return CandidateOutcome::Busy;
    }

    match settle_project(dir, policy).await {
        SettleOutcome::Ready(_) => {}
        SettleOutcome::Incomplete => return CandidateOutcome::Incomplete,
        SettleOutcome::Unstable => {
            warn!(
                dir = ?dir,
                checks = policy.max_checks,
                "project inputs kept changing; giving up"
            );
            return CandidateOutcome::Unstable;
        }
    }

    let Some(permit) = pipeline.try_admit() else {
        debug!(dir = ?dir, "another run claimed the pipeline first");
        return CandidateOutcome::LostRace;
    };

    let Some(project) = Project::from_dir(dir) else {
        debug!(dir = ?dir, "project vanished before the run started");
        return CandidateOutcome::Incomplete;
    };

    info!(project = %project.name(), "input found; starting processing");
    CandidateOutcome::Processed(pipeline.process(project, permit).await)
}
