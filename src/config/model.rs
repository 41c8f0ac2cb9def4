// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [paths]
/// input_dir = "input_stories"
/// processed_dir = "processed_stories"
/// output_dir = "output_storyboards"
///
/// [watch]
/// settle_interval_ms = 500
///
/// [image]
/// model = "stability-ai/sdxl"
/// prompt_strength = 0.6
/// ```
///
/// All sections are optional and have reasonable defaults. API credentials
/// never live here; see [`crate::config::Credentials`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub story: StorySection,

    #[serde(default)]
    pub image: ImageSection,

    #[serde(default)]
    pub vectorize: VectorizeSection,

    #[serde(default)]
    pub http: HttpSection,
}

/// `[paths]` section: the three directories the watcher works with.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Watched root; each project is a subdirectory.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Where consumed projects are moved to.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    /// Where per-run output folders are created.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input_stories")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("processed_stories")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output_storyboards")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            processed_dir: default_processed_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// `[watch]` section: how long to wait for input files to stop growing.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Delay between two size observations of the input files.
    #[serde(default = "default_settle_interval_ms")]
    pub settle_interval_ms: u64,

    /// Maximum number of observations before giving up on a project.
    #[serde(default = "default_settle_max_checks")]
    pub settle_max_checks: u32,
}

fn default_settle_interval_ms() -> u64 {
    500
}

fn default_settle_max_checks() -> u32 {
    20
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            settle_interval_ms: default_settle_interval_ms(),
            settle_max_checks: default_settle_max_checks(),
        }
    }
}

impl WatchSection {
    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }
}

/// `[story]` section: the language model that splits a story into scenes.
#[derive(Debug, Clone, Deserialize)]
pub struct StorySection {
    #[serde(default = "default_story_model")]
    pub model: String,

    #[serde(default = "default_story_base_url")]
    pub base_url: String,

    /// Style directive embedded in the instruction template.
    #[serde(default = "default_story_style")]
    pub style: String,
}

fn default_story_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_story_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_story_style() -> String {
    "black and white coloring book page, clean line art, no shading, white background".to_string()
}

impl Default for StorySection {
    fn default() -> Self {
        Self {
            model: default_story_model(),
            base_url: default_story_base_url(),
            style: default_story_style(),
        }
    }
}

/// `[image]` section: the hosted image-to-image model.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSection {
    /// `owner/name:version`, or `owner/name` to use the latest version.
    #[serde(default = "default_image_model")]
    pub model: String,

    #[serde(default = "default_image_base_url")]
    pub base_url: String,

    /// Appended to every scene prompt.
    #[serde(default = "default_prompt_suffix")]
    pub prompt_suffix: String,

    #[serde(default = "default_negative_prompt")]
    pub negative_prompt: String,

    /// How strongly the prompt may override the reference image (0..=1).
    #[serde(default = "default_prompt_strength")]
    pub prompt_strength: f64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on status polls for one prediction.
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

fn default_image_model() -> String {
    "stability-ai/sdxl:39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b"
        .to_string()
}

fn default_image_base_url() -> String {
    "https://api.replicate.com/v1".to_string()
}

fn default_prompt_suffix() -> String {
    ", line art, coloring book style, black and white".to_string()
}

fn default_negative_prompt() -> String {
    "shading, gradient, gray, color, text, watermark, blurry, realistic, photo, 3d render"
        .to_string()
}

fn default_prompt_strength() -> f64 {
    0.5
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_polls() -> u32 {
    300
}

impl Default for ImageSection {
    fn default() -> Self {
        Self {
            model: default_image_model(),
            base_url: default_image_base_url(),
            prompt_suffix: default_prompt_suffix(),
            negative_prompt: default_negative_prompt(),
            prompt_strength: default_prompt_strength(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

impl ImageSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// `[vectorize]` section: the local raster-to-vector tracer.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizeSection {
    /// Tracer executable, looked up on `PATH` unless absolute.
    #[serde(default = "default_tracer")]
    pub tracer: String,

    /// Luma values below this become black; the rest white.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

fn default_tracer() -> String {
    "potrace".to_string()
}

fn default_threshold() -> u8 {
    128
}

impl Default for VectorizeSection {
    fn default() -> Self {
        Self {
            tracer: default_tracer(),
            threshold: default_threshold(),
        }
    }
}

/// `[http]` section: shared settings for outbound API calls.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` (see
/// `validate.rs`), so holders can rely on its invariants.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    paths: PathsSection,
    watch: WatchSection,
    story: StorySection,
    image: ImageSection,
    vectorize: VectorizeSection,
    http: HttpSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            paths: raw.paths,
            watch: raw.watch,
            story: raw.story,
            image: raw.image,
            vectorize: raw.vectorize,
            http: raw.http,
        }
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn input_dir(&self) -> &Path {
        &self.paths.input_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.paths.processed_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.paths.output_dir
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn story(&self) -> &StorySection {
        &self.story
    }

    pub fn image(&self) -> &ImageSection {
        &self.image
    }

    pub fn vectorize(&self) -> &VectorizeSection {
        &self.vectorize
    }

    pub fn http(&self) -> &HttpSection {
        &self.http
    }
}
