// src/pipeline/orchestrator.rs

//! Runs one project through story → images → vectors.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::image::ImageGenerator;
use crate::pipeline::layout::{
    PROMPTS_FILE, create_unique_dir, raster_file_name, stamped_name, unix_timestamp,
    vector_file_name,
};
use crate::pipeline::report::{RunReport, SceneOutcome, SceneReport};
use crate::story::StoryProcessor;
use crate::types::{Capability, Project, PromptOrigin};
use crate::vectorize::Vectorize;

/// Prompts used when the story processor cannot provide any.
pub const PLACEHOLDER_PROMPTS: [&str; 2] = ["scene 1", "scene 2"];

pub fn placeholder_prompts() -> Vec<String> {
    PLACEHOLDER_PROMPTS.iter().map(|s| s.to_string()).collect()
}

/// Composes the three collaborators for a single project.
///
/// Collaborator failures never abort a run: the story step degrades to
/// placeholder prompts and each scene records its own outcome. Only faults
/// outside the collaborators (output folder, story file, `prompts.json`)
/// surface as `Err`.
pub struct Orchestrator {
    output_root: PathBuf,
    story: Capability<Arc<dyn StoryProcessor>>,
    images: Capability<Arc<dyn ImageGenerator>>,
    vectorizer: Arc<dyn Vectorize>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("output_root", &self.output_root)
            .field("story", &self.story.is_available())
            .field("images", &self.images.is_available())
            .field("vectorizer", &self.vectorizer.is_available())
            .finish()
    }
}

impl Orchestrator {
    pub fn new(
        output_root: impl Into<PathBuf>,
        story: Capability<Arc<dyn StoryProcessor>>,
        images: Capability<Arc<dyn ImageGenerator>>,
        vectorizer: Arc<dyn Vectorize>,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            story,
            images,
            vectorizer,
        }
    }

    #[instrument(skip(self, project), fields(project = %project.name()))]
    pub async fn run(&self, project: &Project) -> Result<RunReport> {
        let base = stamped_name(project.name(), unix_timestamp());
        let output_dir = create_unique_dir(&self.output_root, &base)
            .await
            .with_context(|| format!("creating output folder for '{}'", project.name()))?;
        info!(output = ?output_dir, "created output folder");

        let story = tokio::fs::read_to_string(project.story_path())
            .await
            .with_context(|| format!("reading story {:?}", project.story_path()))?;

        let (prompts, prompt_origin) = self.scene_prompts(&story).await;
        info!(scenes = prompts.len(), origin = %prompt_origin, "scene prompts ready");

        let prompts_json =
            serde_json::to_string_pretty(&prompts).context("serializing scene prompts")?;
        let prompts_path = output_dir.join(PROMPTS_FILE);
        tokio::fs::write(&prompts_path, prompts_json)
            .await
            .with_context(|| format!("writing {:?}", prompts_path))?;

        let mut scenes = Vec::with_capacity(prompts.len());
        for (i, prompt) in prompts.iter().enumerate() {
            let index = i + 1;
            let outcome = self
                .render_scene(index, prompt, project.source_path(), &output_dir)
                .await;
            scenes.push(SceneReport {
                index,
                prompt: prompt.clone(),
                outcome,
            });
        }

        let report = RunReport {
            project: project.name().to_string(),
            output_dir,
            prompt_origin,
            prompts,
            scenes,
        };

        info!(
            output = ?report.output_dir,
            complete = report.complete_count(),
            raster_only = report.raster_only_count(),
            failed = report.failed_count(),
            "pipeline run finished"
        );

        Ok(report)
    }

    async fn scene_prompts(&self, story: &str) -> (Vec<String>, PromptOrigin) {
        let reason = match &self.story {
            Capability::Unavailable { reason } => reason.clone(),
            Capability::Available(processor) => match processor.scene_prompts(story).await {
                Ok(prompts) if !prompts.is_empty() => return (prompts, PromptOrigin::Story),
                Ok(_) => format!("{} returned no prompts", processor.label()),
                Err(err) => format!("{} failed: {err}", processor.label()),
            },
        };

        warn!(%reason, "using placeholder prompts");
        (placeholder_prompts(), PromptOrigin::Placeholder { reason })
    }

    #[instrument(skip(self, prompt, reference, output_dir))]
    async fn render_scene(
        &self,
        index: usize,
        prompt: &str,
        reference: &Path,
        output_dir: &Path,
    ) -> SceneOutcome {
        let generator = match &self.images {
            Capability::Available(generator) => generator,
            Capability::Unavailable { reason } => {
                warn!(%reason, "skipping image generation");
                return SceneOutcome::Failed {
                    error: format!("image generation unavailable: {reason}"),
                };
            }
        };

        let raster = output_dir.join(raster_file_name(index));
        if let Err(err) = generator.generate_scene(prompt, reference, &raster).await {
            warn!(error = %err, "failed to generate scene image");
            return SceneOutcome::Failed {
                error: err.to_string(),
            };
        }

        let vector = output_dir.join(vector_file_name(index));
        match self.vectorizer.vectorize(&raster, &vector).await {
            Ok(()) => SceneOutcome::Complete { raster, vector },
            Err(err) => {
                warn!(error = %err, "scene kept as raster only");
                SceneOutcome::RasterOnly {
                    raster,
                    error: err.to_string(),
                }
            }
        }
    }
}
