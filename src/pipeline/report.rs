// src/pipeline/report.rs

use std::path::PathBuf;

use crate::types::PromptOrigin;

/// What happened to one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneOutcome {
    /// Raster and SVG were both written.
    Complete { raster: PathBuf, vector: PathBuf },
    /// The raster was written but vectorization failed or was skipped.
    RasterOnly { raster: PathBuf, error: String },
    /// No raster could be produced; nothing was written for this scene.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneReport {
    /// 1-based scene index, as used in `scene_NN` file names.
    pub index: usize,
    pub prompt: String,
    pub outcome: SceneOutcome,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub project: String,
    pub output_dir: PathBuf,
    pub prompt_origin: PromptOrigin,
    pub prompts: Vec<String>,
    pub scenes: Vec<SceneReport>,
}

impl RunReport {
    pub fn complete_count(&self) -> usize {
        self.count(|o| matches!(o, SceneOutcome::Complete { .. }))
    }

    pub fn raster_only_count(&self) -> usize {
        self.count(|o| matches!(o, SceneOutcome::RasterOnly { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, SceneOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&SceneOutcome) -> bool) -> usize {
        self.scenes.iter().filter(|s| pred(&s.outcome)).count()
    }
}
