//! In-memory collaborators for driving the orchestrator without network
//! access or a tracer binary.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use storyboard::errors::{CollabResult, CollaboratorError};
use storyboard::image::ImageGenerator;
use storyboard::story::StoryProcessor;
use storyboard::types::BoxFuture;
use storyboard::vectorize::Vectorize;

#[derive(Debug, Clone)]
enum StoryReply {
    Prompts(Vec<String>),
    Fail(String),
}

/// A fake story processor that:
/// - records every story it was asked about
/// - answers with a canned prompt list or a canned failure.
#[derive(Debug, Clone)]
pub struct FakeStory {
    reply: StoryReply,
    pub stories: Arc<Mutex<Vec<String>>>,
}

impl FakeStory {
    pub fn returning(prompts: &[&str]) -> Self {
        Self {
            reply: StoryReply::Prompts(prompts.iter().map(|p| p.to_string()).collect()),
            stories: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: StoryReply::Fail(message.to_string()),
            stories: Arc::default(),
        }
    }
}

impl StoryProcessor for FakeStory {
    fn label(&self) -> &str {
        "fake-story"
    }

    fn scene_prompts<'a>(&'a self, story: &'a str) -> BoxFuture<'a, CollabResult<Vec<String>>> {
        Box::pin(async move {
            self.stories.lock().unwrap().push(story.to_string());
            match &self.reply {
                StoryReply::Prompts(p) => Ok(p.clone()),
                StoryReply::Fail(msg) => Err(CollaboratorError::Parse(msg.clone())),
            }
        })
    }
}

/// One recorded call to [`FakeImages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCall {
    pub prompt: String,
    pub reference: PathBuf,
    pub dest: PathBuf,
}

/// A fake image generator that writes fixed bytes to the destination,
/// except for the calls listed in `fail_calls` (1-based), which fail without
/// creating anything.
#[derive(Debug, Clone)]
pub struct FakeImages {
    bytes: Vec<u8>,
    fail_calls: Vec<usize>,
    pub calls: Arc<Mutex<Vec<ImageCall>>>,
}

impl FakeImages {
    pub fn writing(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            fail_calls: Vec::new(),
            calls: Arc::default(),
        }
    }

    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.fail_calls = calls.to_vec();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ImageGenerator for FakeImages {
    fn label(&self) -> &str {
        "fake-images"
    }

    fn generate_scene<'a>(
        &'a self,
        prompt: &'a str,
        reference: &'a Path,
        dest: &'a Path,
    ) -> BoxFuture<'a, CollabResult<()>> {
        Box::pin(async move {
            let n = {
                let mut guard = self.calls.lock().unwrap();
                guard.push(ImageCall {
                    prompt: prompt.to_string(),
                    reference: reference.to_path_buf(),
                    dest: dest.to_path_buf(),
                });
                guard.len()
            };

            if self.fail_calls.contains(&n) {
                return Err(CollaboratorError::RemoteFailed(format!("call {n} refused")));
            }

            tokio::fs::write(dest, &self.bytes).await?;
            Ok(())
        })
    }
}

/// A fake vectorizer: when available it writes a tiny SVG; otherwise it
/// fails with `ToolMissing` and writes nothing.
#[derive(Debug, Clone)]
pub struct FakeVectorizer {
    available: bool,
    pub rasters: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeVectorizer {
    pub fn available() -> Self {
        Self {
            available: true,
            rasters: Arc::default(),
        }
    }

    pub fn missing() -> Self {
        Self {
            available: false,
            rasters: Arc::default(),
        }
    }
}

impl Vectorize for FakeVectorizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn vectorize<'a>(&'a self, raster: &'a Path, svg: &'a Path) -> BoxFuture<'a, CollabResult<()>> {
        Box::pin(async move {
            self.rasters.lock().unwrap().push(raster.to_path_buf());
            if !self.available {
                return Err(CollaboratorError::ToolMissing("fake-tracer".to_string()));
            }
            tokio::fs::write(svg, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").await?;
            Ok(())
        })
    }
}
