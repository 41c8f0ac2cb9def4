// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StoryboardError};
use crate::image::ModelRef;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StoryboardError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_watch(cfg)?;
    validate_story(cfg)?;
    validate_image(cfg)?;
    validate_vectorize(cfg)?;
    validate_http(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> StoryboardError {
    StoryboardError::ConfigError(msg.into())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;
    let named = [
        ("input_dir", &paths.input_dir),
        ("processed_dir", &paths.processed_dir),
        ("output_dir", &paths.output_dir),
    ];

    for (name, path) in named.iter() {
        if path.as_os_str().is_empty() {
            return Err(config_error(format!("[paths].{name} must not be empty")));
        }
    }

    for (i, (a_name, a)) in named.iter().enumerate() {
        for (b_name, b) in named.iter().skip(i + 1) {
            if a == b {
                return Err(config_error(format!(
                    "[paths].{a_name} and [paths].{b_name} must differ (both {:?})",
                    a
                )));
            }
        }
    }

    // Moving a project into a directory below the watched root would fire
    // fresh creation events for it.
    for (name, path) in named.iter().skip(1) {
        if path.starts_with(&paths.input_dir) {
            return Err(config_error(format!(
                "[paths].{name} ({:?}) must not be inside [paths].input_dir ({:?})",
                path, paths.input_dir
            )));
        }
    }

    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.settle_interval_ms == 0 {
        return Err(config_error(
            "[watch].settle_interval_ms must be >= 1 (got 0)",
        ));
    }
    if cfg.watch.settle_max_checks < 2 {
        return Err(config_error(format!(
            "[watch].settle_max_checks must be >= 2 (got {})",
            cfg.watch.settle_max_checks
        )));
    }
    Ok(())
}

fn validate_story(cfg: &RawConfigFile) -> Result<()> {
    if cfg.story.model.trim().is_empty() {
        return Err(config_error("[story].model must not be empty"));
    }
    if cfg.story.base_url.trim().is_empty() {
        return Err(config_error("[story].base_url must not be empty"));
    }
    Ok(())
}

fn validate_image(cfg: &RawConfigFile) -> Result<()> {
    let image = &cfg.image;

    image
        .model
        .parse::<ModelRef>()
        .map_err(|e| config_error(format!("[image].model: {e}")))?;

    if image.base_url.trim().is_empty() {
        return Err(config_error("[image].base_url must not be empty"));
    }

    if !(0.0..=1.0).contains(&image.prompt_strength) {
        return Err(config_error(format!(
            "[image].prompt_strength must be within 0.0..=1.0 (got {})",
            image.prompt_strength
        )));
    }

    if image.poll_interval_ms == 0 {
        return Err(config_error("[image].poll_interval_ms must be >= 1 (got 0)"));
    }

    if image.max_polls == 0 {
        return Err(config_error("[image].max_polls must be >= 1 (got 0)"));
    }

    Ok(())
}

fn validate_vectorize(cfg: &RawConfigFile) -> Result<()> {
    if cfg.vectorize.tracer.trim().is_empty() {
        return Err(config_error("[vectorize].tracer must not be empty"));
    }
    Ok(())
}

fn validate_http(cfg: &RawConfigFile) -> Result<()> {
    if cfg.http.timeout_secs == 0 {
        return Err(config_error("[http].timeout_secs must be >= 1 (got 0)"));
    }
    Ok(())
}
