// src/vectorize/bitmap.rs

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageError, ImageFormat, Luma};

use crate::errors::{CollabResult, CollaboratorError};

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Threshold an image into pure black and white, without dithering.
///
/// Pixels darker than `threshold` become black. Mostly transparent pixels
/// become white so cut-out images trace as outlines, not solid blocks.
pub fn to_two_tone(img: &DynamicImage, threshold: u8) -> GrayImage {
    let gray = img.to_luma_alpha8();
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let [luma, alpha] = gray.get_pixel(x, y).0;
        if alpha < 128 || luma >= threshold {
            WHITE
        } else {
            BLACK
        }
    })
}

/// Decode `src`, threshold it and save the result as a BMP at `dest`.
pub fn write_two_tone_bmp(src: &Path, dest: &Path, threshold: u8) -> CollabResult<()> {
    let img = image::open(src).map_err(image_error)?;
    let bw = to_two_tone(&img, threshold);
    bw.save_with_format(dest, ImageFormat::Bmp)
        .map_err(image_error)
}

fn image_error(err: ImageError) -> CollaboratorError {
    match err {
        ImageError::IoError(e) => CollaboratorError::Io(e),
        other => CollaboratorError::Parse(format!("image conversion: {other}")),
    }
}
