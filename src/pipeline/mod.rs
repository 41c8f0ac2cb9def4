// src/pipeline/mod.rs

//! Pipeline orchestration.
//!
//! - [`orchestrator`] runs one project through the three collaborators.
//! - [`gate`] admits at most one run at a time.
//! - [`layout`] owns file and folder naming.
//! - [`report`] describes what a run produced.
//!
//! [`Pipeline`] couples admission and execution: a run can only start with a
//! [`RunPermit`], and the permit is released only after the consumed project
//! has been moved out of the watched tree.

pub mod gate;
pub mod layout;
pub mod orchestrator;
pub mod report;

pub use gate::{RunGate, RunPermit};
pub use orchestrator::{Orchestrator, PLACEHOLDER_PROMPTS, placeholder_prompts};
pub use report::{RunReport, SceneOutcome, SceneReport};

use std::path::PathBuf;

use tracing::{error, info};

use crate::pipeline::layout::{relocate_project, unix_timestamp};
use crate::types::Project;

/// Result of [`Pipeline::process`].
#[derive(Debug)]
pub struct ProcessOutcome {
    pub run: anyhow::Result<RunReport>,
    /// New location of the project directory, if the move succeeded.
    pub relocated: Option<PathBuf>,
}

/// Orchestrator plus its admission gate and the processed-items area.
#[derive(Debug)]
pub struct Pipeline {
    orchestrator: Orchestrator,
    gate: RunGate,
    processed_root: PathBuf,
}

impl Pipeline {
    pub fn new(orchestrator: Orchestrator, processed_root: impl Into<PathBuf>) -> Self {
        Self {
            orchestrator,
            gate: RunGate::new(),
            processed_root: processed_root.into(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Claim the single run slot.
    pub fn try_admit(&self) -> Option<RunPermit> {
        self.gate.try_acquire()
    }

    /// Run `project`, then move its directory to the processed area whatever
    /// the outcome, then release `permit`.
    pub async fn process(&self, project: Project, permit: RunPermit) -> ProcessOutcome {
        info!(project = %project.name(), dir = ?project.dir(), "starting pipeline run");

        let run = self.orchestrator.run(&project).await;
        match &run {
            Ok(report) => info!(
                project = %project.name(),
                output = ?report.output_dir,
                "pipeline completed"
            ),
            Err(err) => error!(project = %project.name(), error = ?err, "pipeline failed"),
        }

        let relocated = match relocate_project(
            project.dir(),
            &self.processed_root,
            project.name(),
            unix_timestamp(),
        )
        .await
        {
            Ok(dest) => {
                info!(project = %project.name(), dest = ?dest, "moved input to processed area");
                Some(dest)
            }
            Err(err) => {
                error!(
                    project = %project.name(),
                    dir = ?project.dir(),
                    error = %err,
                    "failed to move input out of the watched tree"
                );
                None
            }
        };

        drop(permit);
        ProcessOutcome { run, relocated }
    }
}
