// src/story/gemini.rs

//! Gemini-backed story processor.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::StorySection;
use crate::errors::{CollabResult, CollaboratorError};
use crate::story::StoryProcessor;
use crate::story::prompts::{build_instruction, parse_scene_prompts};
use crate::types::BoxFuture;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any.
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Story processor that asks a Gemini model for scene prompts.
#[derive(Debug, Clone)]
pub struct GeminiStoryProcessor {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    style: String,
}

impl GeminiStoryProcessor {
    pub fn new(client: Client, api_key: impl Into<String>, cfg: &StorySection) -> Self {
        debug!(model = %cfg.model, "creating Gemini story processor");
        Self {
            client,
            api_key: api_key.into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            style: cfg.style.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    #[instrument(skip(self, story), fields(model = %self.model, story_len = story.len()))]
    async fn request_prompts(&self, story: &str) -> CollabResult<Vec<String>> {
        let instruction = build_instruction(story, &self.style);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &instruction }],
            }],
        };

        debug!("sending generateContent request");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "story request failed");
                CollaboratorError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "story API returned error");
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to decode story API response");
            CollaboratorError::Parse(format!("story API response: {e}"))
        })?;

        let text = parsed.first_text().ok_or_else(|| {
            CollaboratorError::Parse("story API response contained no text".to_string())
        })?;

        let prompts = parse_scene_prompts(&text)?;
        info!(scenes = prompts.len(), "story split into scene prompts");
        Ok(prompts)
    }
}

impl StoryProcessor for GeminiStoryProcessor {
    fn label(&self) -> &str {
        &self.model
    }

    fn scene_prompts<'a>(&'a self, story: &'a str) -> BoxFuture<'a, CollabResult<Vec<String>>> {
        Box::pin(self.request_prompts(story))
    }
}
