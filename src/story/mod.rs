// src/story/mod.rs

//! Story processing: turning free-form story text into scene prompts.
//!
//! - [`prompts`] builds the instruction sent to the language model and parses
//!   its reply into an ordered list of prompts.
//! - [`gemini`] is the production [`StoryProcessor`], backed by the Gemini
//!   `generateContent` endpoint.
//!
//! Tests swap in their own `StoryProcessor` that returns canned prompts.

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiStoryProcessor;
pub use prompts::{build_instruction, parse_scene_prompts, strip_code_fences};

use crate::errors::CollabResult;
use crate::types::BoxFuture;

/// Splits a story into an ordered sequence of scene prompts.
///
/// Implementations report failures as [`crate::errors::CollaboratorError`];
/// they never panic and never retry.
pub trait StoryProcessor: Send + Sync {
    /// Short human-readable label used in logs (e.g. the model name).
    fn label(&self) -> &str;

    fn scene_prompts<'a>(&'a self, story: &'a str) -> BoxFuture<'a, CollabResult<Vec<String>>>;
}
