// src/config/credentials.rs

//! API credentials, read from the environment (after `.env` is loaded).

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the story model key.
pub const STORY_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable holding the image model token.
pub const IMAGE_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";

/// Load the nearest `.env` into the process environment, returning its path.
/// Variables already set are left alone.
///
/// Must run before logging is initialised so `.env` can set the log level.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific `.env` file into the process environment.
pub fn load_dotenv_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

/// Optional API credentials. Missing values degrade the matching
/// collaborator instead of aborting startup.
#[derive(Clone, Default)]
pub struct Credentials {
    pub story_api_key: Option<String>,
    pub image_api_token: Option<String>,
}

impl Credentials {
    /// Read both credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup. Blank values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            story_api_key: read(STORY_KEY_VAR),
            image_api_token: read(IMAGE_TOKEN_VAR),
        }
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("story_api_key", &self.story_api_key.as_ref().map(|_| "<set>"))
            .field(
                "image_api_token",
                &self.image_api_token.as_ref().map(|_| "<set>"),
            )
            .finish()
    }
}
