// src/config/mod.rs

//! Configuration loading and validation for storyboard.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like distinct directories (`validate.rs`).
//! - Read API credentials from the environment (`credentials.rs`).

pub mod credentials;
pub mod loader;
pub mod model;
pub mod validate;

pub use credentials::{Credentials, load_dotenv, load_dotenv_from};
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, HttpSection, ImageSection, PathsSection, RawConfigFile, StorySection,
    VectorizeSection, WatchSection,
};
