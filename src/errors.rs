// src/errors.rs

//! Crate-wide error types.
//!
//! - [`StoryboardError`] covers startup and configuration failures.
//! - [`CollaboratorError`] is what every external collaborator (story model,
//!   image model, tracer) hands back to the orchestrator, which then decides
//!   whether to degrade or record the failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryboardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure reported by a collaborator boundary.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The hosted API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The hosted job ran but reported failure or cancellation.
    #[error("remote job failed: {0}")]
    RemoteFailed(String),

    /// The response arrived but could not be understood.
    #[error("parse error: {0}")]
    Parse(String),

    /// The local tracer binary is not installed.
    #[error("tool not available: {0}")]
    ToolMissing(String),

    /// The local tracer ran but exited unsuccessfully.
    #[error("tool '{tool}' exited with status {status}")]
    Tool { tool: String, status: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CollaboratorError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() => CollaboratorError::Parse(err.to_string()),
            None => CollaboratorError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CollaboratorError {
    fn from(err: serde_json::Error) -> Self {
        CollaboratorError::Parse(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StoryboardError>;

/// Result alias used at collaborator boundaries.
pub type CollabResult<T> = std::result::Result<T, CollaboratorError>;
