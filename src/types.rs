// src/types.rs

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Boxed future returned by the collaborator traits, so they stay object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// File name of the story text inside a project directory.
pub const STORY_FILE: &str = "story.txt";

/// File name of the reference portrait inside a project directory.
pub const SOURCE_FILE: &str = "source.png";

/// Returns true if `name` is one of the two files that make up a project.
pub fn is_project_input(name: &str) -> bool {
    name == STORY_FILE || name == SOURCE_FILE
}

/// One story-to-storyboard job: a directory holding `story.txt` and
/// `source.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    dir: PathBuf,
    story_path: PathBuf,
    source_path: PathBuf,
}

impl Project {
    /// Build a project from a directory, or `None` if either required input
    /// is missing (or the directory has no usable name).
    pub fn from_dir(dir: impl Into<PathBuf>) -> Option<Self> {
        let dir = dir.into();
        let name = dir.file_name()?.to_string_lossy().into_owned();
        let story_path = dir.join(STORY_FILE);
        let source_path = dir.join(SOURCE_FILE);

        if !story_path.is_file() || !source_path.is_file() {
            return None;
        }

        Some(Self {
            name,
            dir,
            story_path,
            source_path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn story_path(&self) -> &Path {
        &self.story_path
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// An optional collaborator.
///
/// Missing credentials produce `Unavailable`; the orchestrator matches on this
/// explicitly instead of probing for a falsy handle.
#[derive(Debug, Clone)]
pub enum Capability<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Capability<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Capability::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

/// Where the prompt list of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOrigin {
    /// Returned by the story processor.
    Story,
    /// Placeholder prompts substituted because the story processor was
    /// unavailable, failed, or returned nothing.
    Placeholder { reason: String },
}

impl fmt::Display for PromptOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptOrigin::Story => write!(f, "story processor"),
            PromptOrigin::Placeholder { reason } => write!(f, "placeholder ({reason})"),
        }
    }
}
