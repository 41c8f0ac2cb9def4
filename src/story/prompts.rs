// src/story/prompts.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{CollabResult, CollaboratorError};

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Opening fences may carry a language tag (```json); closing ones don't.
    Regex::new(r"```[A-Za-z]*").expect("fence regex is valid")
});

/// Build the instruction sent to the language model.
pub fn build_instruction(story: &str, style: &str) -> String {
    format!(
        r#"You are an expert storyboard artist.
Read the following story and break it down into a sequence of vivid, descriptive image prompts for an AI image generator.

The style should be: "{style}".

Story:
{story}

Rules:
1. Return ONLY a JSON array of strings.
2. Each string should be a standalone prompt describing the scene.
3. Include "(character)" in the prompt where the main character appears, so we can replace it later if needed, or keep it generic.
4. Focus on visual action.

Example Output:
["coloring book page, line art, heavy black lines, white background, (character) walking through a spooky forest", "coloring book page, line art, close up of (character) looking surprised at a owl"]
"#
    )
}

/// Remove markdown code-fence markers anywhere in `text` and trim it.
pub fn strip_code_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Parse a model reply into scene prompts.
///
/// The reply must be a JSON array of strings, optionally wrapped in code
/// fences. Anything else is a [`CollaboratorError::Parse`].
pub fn parse_scene_prompts(text: &str) -> CollabResult<Vec<String>> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(CollaboratorError::Parse(
            "model reply was empty".to_string(),
        ));
    }

    let prompts: Vec<String> = serde_json::from_str(&cleaned).map_err(|e| {
        CollaboratorError::Parse(format!("expected a JSON array of strings: {e}"))
    })?;

    Ok(prompts)
}
