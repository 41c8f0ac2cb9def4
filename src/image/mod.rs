// src/image/mod.rs

//! Scene image generation.
//!
//! - [`model`] parses the `owner/name[:version]` model reference from config.
//! - [`replicate`] is the production [`ImageGenerator`], an image-to-image
//!   call against the Replicate predictions API.

pub mod model;
pub mod replicate;

pub use model::ModelRef;
pub use replicate::{PredictionInput, ReplicateImageGenerator};

use std::path::Path;

use crate::errors::CollabResult;
use crate::types::BoxFuture;

/// Produces one raster image for a scene prompt, guided by a reference image.
///
/// On success the destination file exists and holds the image. On failure
/// the destination is left untouched.
pub trait ImageGenerator: Send + Sync {
    fn label(&self) -> &str;

    fn generate_scene<'a>(
        &'a self,
        prompt: &'a str,
        reference: &'a Path,
        dest: &'a Path,
    ) -> BoxFuture<'a, CollabResult<()>>;
}
