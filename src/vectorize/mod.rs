// src/vectorize/mod.rs

//! Raster to SVG line-art conversion.
//!
//! - [`bitmap`] turns a raster into a strict two-tone bitmap.
//! - [`potrace`] drives the external tracer over that bitmap.

pub mod bitmap;
pub mod potrace;

pub use bitmap::{to_two_tone, write_two_tone_bmp};
pub use potrace::PotraceVectorizer;

use std::path::Path;

use crate::errors::CollabResult;
use crate::types::BoxFuture;

/// Converts one raster image into one SVG file.
pub trait Vectorize: Send + Sync {
    /// Whether calls can succeed at all (e.g. the tracer binary exists).
    fn is_available(&self) -> bool;

    fn vectorize<'a>(&'a self, raster: &'a Path, svg: &'a Path) -> BoxFuture<'a, CollabResult<()>>;
}
