// src/watch/settle.rs

//! Readiness check for candidate projects.
//!
//! A project is settled once both inputs exist and their sizes are equal
//! across two consecutive observations, which is how a slow copy is told
//! apart from a finished one. A candidate whose inputs never all appear
//! within the policy is incomplete.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::config::WatchSection;
use crate::types::{Project, SOURCE_FILE, STORY_FILE};

/// How often and how long to observe a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub interval: Duration,
    pub max_checks: u32,
}

impl SettlePolicy {
    pub fn from_config(cfg: &WatchSection) -> Self {
        Self {
            interval: cfg.settle_interval(),
            max_checks: cfg.settle_max_checks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Both inputs are present and stable.
    Ready(Project),
    /// At least one input was still missing at the last observation.
    Incomplete,
    /// Inputs kept changing for every observation.
    Unstable,
}

async fn input_sizes(dir: &Path) -> Option<(u64, u64)> {
    let story = tokio::fs::metadata(dir.join(STORY_FILE)).await.ok()?;
    let source = tokio::fs::metadata(dir.join(SOURCE_FILE)).await.ok()?;
    if !story.is_file() || !source.is_file() {
        return None;
    }
    Some((story.len(), source.len()))
}

/// Observe `dir` until its inputs settle or the policy runs out.
///
/// Missing inputs are observed again on the next check, so files that land
/// shortly after their directory are still picked up.
pub async fn settle_project(dir: &Path, policy: &SettlePolicy) -> SettleOutcome {
    let mut previous: Option<(u64, u64)> = None;
    let mut complete = false;

    for check in 0..policy.max_checks {
        if check > 0 {
            tokio::time::sleep(policy.interval).await;
        }

        let Some(current) = input_sizes(dir).await else {
            debug!(dir = ?dir, check, "project inputs incomplete");
            previous = None;
            complete = false;
            continue;
        };
        complete = true;

        if previous == Some(current) {
            debug!(dir = ?dir, check, ?current, "project inputs settled");
            return match Project::from_dir(dir) {
                Some(project) => SettleOutcome::Ready(project),
                None => SettleOutcome::Incomplete,
            };
        }

        debug!(dir = ?dir, check, ?current, "project inputs still changing");
        previous = Some(current);
    }

    if complete {
        SettleOutcome::Unstable
    } else {
        SettleOutcome::Incomplete
    }
}
