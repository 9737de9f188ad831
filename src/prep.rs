//! One-shot input preparation: keying out light sprite backgrounds and
//! squaring background images.

use std::path::Path;

use anyhow::Context as _;
use image::{RgbImage, RgbaImage, imageops::FilterType};

use crate::{
    assets::catalog::{RESIZE_EXTENSIONS, SPRITE_EXTENSIONS, list_files_with_extensions},
    foundation::error::{SynthError, SynthResult},
};

/// Default lower bound for "near white" in [`strip_light_background`].
pub const DEFAULT_KEY_THRESHOLD: u8 = 240;

/// Default side length for [`resize_to_square`].
pub const DEFAULT_SQUARE_SIDE: u32 = 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PrepSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Zero the alpha of every pixel whose R, G and B are all `>= threshold`.
///
/// Returns how many pixels were keyed out.
pub fn key_out_light_pixels(img: &mut RgbaImage, threshold: u8) -> usize {
    let mut keyed = 0;
    for px in img.pixels_mut() {
        if px.0[..3].iter().all(|&c| c >= threshold) {
            px.0[3] = 0;
            keyed += 1;
        }
    }
    keyed
}

/// Key out near-white backgrounds of every PNG in `input_dir`, writing PNGs
/// with the same names to `output_dir`.
pub fn strip_light_background(
    input_dir: &Path,
    output_dir: &Path,
    threshold: u8,
) -> SynthResult<PrepSummary> {
    std::fs::create_dir_all(output_dir).map_err(|e| SynthError::io(output_dir, e))?;
    let mut summary = PrepSummary::default();

    for path in list_files_with_extensions(input_dir, SPRITE_EXTENSIONS)? {
        let mut img = match image::open(&path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable image");
                summary.skipped += 1;
                continue;
            }
        };
        let keyed = key_out_light_pixels(&mut img, threshold);
        let Some(name) = path.file_name() else {
            continue;
        };
        let out = output_dir.join(name);
        img.save_with_format(&out, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", out.display()))?;
        tracing::info!(path = %out.display(), keyed, "keyed out background");
        summary.processed += 1;
    }
    Ok(summary)
}

/// Area averaging when both sides shrink, triangle filter otherwise.
pub fn resize_square(img: &RgbImage, side: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if side <= w && side <= h {
        image::imageops::thumbnail(img, side, side)
    } else {
        image::imageops::resize(img, side, side, FilterType::Triangle)
    }
}

/// Resize every raster in `input_dir` to `side x side`, keeping names and formats.
/// Alpha is dropped.
pub fn resize_to_square(input_dir: &Path, output_dir: &Path, side: u32) -> SynthResult<PrepSummary> {
    if side == 0 {
        return Err(SynthError::validation("square side must be >= 1"));
    }
    std::fs::create_dir_all(output_dir).map_err(|e| SynthError::io(output_dir, e))?;
    let mut summary = PrepSummary::default();

    for path in list_files_with_extensions(input_dir, RESIZE_EXTENSIONS)? {
        let img = match image::open(&path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable image");
                summary.skipped += 1;
                continue;
            }
        };
        let Some(name) = path.file_name() else {
            continue;
        };
        let out = output_dir.join(name);
        resize_square(&img, side)
            .save(&out)
            .with_context(|| format!("write image '{}'", out.display()))?;
        tracing::info!(path = %out.display(), side, "resized");
        summary.processed += 1;
    }
    Ok(summary)
}

#[cfg(test)]
#[path = "../tests/unit/prep.rs"]
mod tests;
