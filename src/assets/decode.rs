use std::path::Path;

use anyhow::Context as _;

use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::{
    foundation::core::Size,
    foundation::error::{SynthError, SynthResult},
    render::composite::Canvas,
};

/// Foreground cutout in straight (non-premultiplied) RGBA8.
///
/// Sources without an alpha channel get a fully opaque one on decode.
#[derive(Clone, Debug)]
pub struct Sprite {
    rgba: RgbaImage,
}

impl Sprite {
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self { rgba }
    }

    pub fn size(&self) -> Size {
        let (w, h) = self.rgba.dimensions();
        Size::new(w, h)
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Derived copy resampled to `target`; `self` is left untouched.
    ///
    /// Pure shrinks use area averaging, anything else a triangle filter.
    pub fn scaled_to(&self, target: Size) -> Sprite {
        if target == self.size() {
            return self.clone();
        }
        let src = self.size();
        let rgba = if target.fits_within(src) {
            image::imageops::thumbnail(&self.rgba, target.width, target.height)
        } else {
            image::imageops::resize(
                &self.rgba,
                target.width,
                target.height,
                FilterType::Triangle,
            )
        };
        Sprite { rgba }
    }
}

/// Decode sprite bytes, keeping source alpha or synthesizing an opaque channel.
pub fn decode_sprite(bytes: &[u8]) -> anyhow::Result<Sprite> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(Sprite::from_rgba(to_rgba_keep_alpha(dyn_img)))
}

/// Read and decode a sprite file.
///
/// Missing, corrupt or unsupported files all map to [`SynthError::SpriteUnreadable`].
pub fn load_sprite(path: &Path) -> SynthResult<Sprite> {
    let unreadable = |reason: String| SynthError::SpriteUnreadable {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    let sprite = decode_sprite(&bytes).map_err(|e| unreadable(format!("{e:#}")))?;
    if !sprite.size().is_drawable() {
        return Err(unreadable("zero-sized image".to_string()));
    }
    Ok(sprite)
}

/// Decode background bytes into an opaque canvas. Source alpha is discarded.
pub fn decode_background(bytes: &[u8]) -> anyhow::Result<Canvas> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(Canvas::from_rgb(&dyn_img.to_rgb8()))
}

/// Read and decode a background file into a [`Canvas`].
pub fn load_background(path: &Path) -> SynthResult<Canvas> {
    let unreadable = |reason: String| SynthError::BackgroundUnreadable {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    let canvas = decode_background(&bytes).map_err(|e| unreadable(format!("{e:#}")))?;
    if !canvas.size().is_drawable() {
        return Err(unreadable("zero-sized image".to_string()));
    }
    Ok(canvas)
}

fn to_rgba_keep_alpha(img: DynamicImage) -> RgbaImage {
    match img {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => other.to_rgba8(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
