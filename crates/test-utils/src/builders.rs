#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use storyboard::config::{ConfigFile, RawConfigFile};
use storyboard::types::{SOURCE_FILE, STORY_FILE};

/// Builder for `ConfigFile` to simplify test setup.
///
/// All three directories are placed side by side under `base`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(base: &Path) -> Self {
        let mut config = RawConfigFile::default();
        config.paths.input_dir = base.join("input");
        config.paths.processed_dir = base.join("processed");
        config.paths.output_dir = base.join("output");
        Self { config }
    }

    pub fn settle(mut self, interval_ms: u64, max_checks: u32) -> Self {
        self.config.watch.settle_interval_ms = interval_ms;
        self.config.watch.settle_max_checks = max_checks;
        self
    }

    pub fn prompt_strength(mut self, val: f64) -> Self {
        self.config.image.prompt_strength = val;
        self
    }

    pub fn image_model(mut self, model: &str) -> Self {
        self.config.image.model = model.to_string();
        self
    }

    pub fn tracer(mut self, tracer: &str) -> Self {
        self.config.vectorize.tracer = tracer.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Bytes written as `source.png` by [`write_project`]. Only fakes read it.
pub const FAKE_SOURCE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-portrait";

/// Create `root/name/` holding `story.txt` and `source.png`.
pub fn write_project(root: &Path, name: &str, story: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("create project dir");
    fs::write(dir.join(STORY_FILE), story).expect("write story");
    fs::write(dir.join(SOURCE_FILE), FAKE_SOURCE_BYTES).expect("write source");
    dir
}

/// Sorted entry names of `dir`.
pub fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
