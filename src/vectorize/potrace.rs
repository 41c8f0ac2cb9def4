// src/vectorize/potrace.rs

//! Vectorizer driving the `potrace` command-line tracer.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::config::VectorizeSection;
use crate::errors::{CollabResult, CollaboratorError};
use crate::types::BoxFuture;
use crate::vectorize::Vectorize;
use crate::vectorize::bitmap::write_two_tone_bmp;

/// Vectorizer backed by an external tracer executable.
///
/// Availability is probed once by [`PotraceVectorizer::probe`] and cached;
/// when the tracer is missing every call fails fast with
/// [`CollaboratorError::ToolMissing`] and touches no files.
#[derive(Debug, Clone)]
pub struct PotraceVectorizer {
    tracer: String,
    threshold: u8,
    available: bool,
}

impl PotraceVectorizer {
    /// Run `<tracer> --version` once and remember whether it worked.
    pub async fn probe(cfg: &VectorizeSection) -> Self {
        let available = match Command::new(&cfg.tracer)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!(tracer = %cfg.tracer, ?status, "tracer version probe failed; vectorization disabled");
                false
            }
            Err(err) => {
                warn!(tracer = %cfg.tracer, error = %err, "tracer not found; vectorization disabled");
                false
            }
        };

        if available {
            info!(tracer = %cfg.tracer, "tracer available");
        }

        Self::with_availability(cfg, available)
    }

    /// Build a vectorizer with a known availability, skipping the probe.
    pub fn with_availability(cfg: &VectorizeSection, available: bool) -> Self {
        Self {
            tracer: cfg.tracer.clone(),
            threshold: cfg.threshold,
            available,
        }
    }

    #[instrument(skip(self), fields(tracer = %self.tracer))]
    async fn trace(&self, raster: &Path, svg: &Path) -> CollabResult<()> {
        if !self.available {
            debug!(raster = ?raster, "skipping vectorization (tracer missing)");
            return Err(CollaboratorError::ToolMissing(self.tracer.clone()));
        }

        let bmp = intermediate_path(raster);
        {
            let (src, dest, threshold) = (raster.to_path_buf(), bmp.clone(), self.threshold);
            tokio::task::spawn_blocking(move || write_two_tone_bmp(&src, &dest, threshold))
                .await
                .map_err(|e| CollaboratorError::Io(std::io::Error::other(e)))??;
        }

        let result = self.run_tracer(&bmp, svg).await;

        if let Err(err) = tokio::fs::remove_file(&bmp).await {
            warn!(bmp = ?bmp, error = %err, "failed to remove intermediate bitmap");
        }

        if result.is_err() && tokio::fs::try_exists(svg).await.unwrap_or(false) {
            let _ = tokio::fs::remove_file(svg).await;
        }

        if result.is_ok() {
            info!(svg = ?svg, "vectorized scene");
        }
        result
    }

    async fn run_tracer(&self, bmp: &Path, svg: &Path) -> CollabResult<()> {
        let mut cmd = Command::new(&self.tracer);
        cmd.arg(bmp)
            .arg("-s")
            .arg("-o")
            .arg(svg)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CollaboratorError::ToolMissing(self.tracer.clone())
            } else {
                CollaboratorError::Io(e)
            }
        })?;

        // Always consume stderr so buffers don't fill; log at debug.
        if let Some(stderr) = child.stderr.take() {
            let tracer = self.tracer.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(tracer = %tracer, "stderr: {}", line);
                }
            });
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(CollaboratorError::Tool {
                tool: self.tracer.clone(),
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

impl Vectorize for PotraceVectorizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn vectorize<'a>(&'a self, raster: &'a Path, svg: &'a Path) -> BoxFuture<'a, CollabResult<()>> {
        Box::pin(self.trace(raster, svg))
    }
}

/// Location of the temporary two-tone bitmap for `raster`.
pub fn intermediate_path(raster: &Path) -> PathBuf {
    raster.with_extension("bmp")
}
