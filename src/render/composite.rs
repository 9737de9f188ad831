use image::{RgbImage, RgbaImage};

use crate::{
    assets::decode::Sprite,
    foundation::core::{Placement, Size},
    foundation::error::{SynthError, SynthResult},
};

/// Background raster being composited onto.
///
/// Alpha is kept at 255 throughout; it is never written by [`composite`] and is
/// dropped by [`Canvas::finalize`].
#[derive(Clone, Debug)]
pub struct Canvas {
    rgba: RgbaImage,
}

impl Canvas {
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let (w, h) = rgb.dimensions();
        let mut rgba = RgbaImage::new(w, h);
        for (dst, src) in rgba.pixels_mut().zip(rgb.pixels()) {
            dst.0 = [src.0[0], src.0[1], src.0[2], 255];
        }
        Self { rgba }
    }

    pub fn filled(size: Size, rgb: [u8; 3]) -> Self {
        Self {
            rgba: RgbaImage::from_pixel(
                size.width,
                size.height,
                image::Rgba([rgb[0], rgb[1], rgb[2], 255]),
            ),
        }
    }

    pub fn size(&self) -> Size {
        let (w, h) = self.rgba.dimensions();
        Size::new(w, h)
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Strip alpha for persistence.
    pub fn finalize(self) -> RgbImage {
        let (w, h) = self.rgba.dimensions();
        let mut rgb = RgbImage::new(w, h);
        for (dst, src) in rgb.pixels_mut().zip(self.rgba.pixels()) {
            dst.0 = [src.0[0], src.0[1], src.0[2]];
        }
        rgb
    }
}

/// Straight-alpha blend of one channel: `a*src + (1-a)*dst`, `a = alpha/255`.
///
/// Computed in `f32`, rounded to nearest (halves away from zero), clamped to `0..=255`.
pub fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let a = f32::from(alpha) / 255.0;
    let v = a * f32::from(src) + (1.0 - a) * f32::from(dst);
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend a straight-alpha RGBA pixel over an opaque canvas pixel. Canvas alpha is kept.
pub fn blend_pixel(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        0 => dst,
        255 => [src[0], src[1], src[2], dst[3]],
        a => [
            blend_channel(dst[0], src[0], a),
            blend_channel(dst[1], src[1], a),
            blend_channel(dst[2], src[2], a),
            dst[3],
        ],
    }
}

/// Paint `sprite` into `canvas` at `placement`, in place.
///
/// The sprite must already be scaled to the placement size, and the placement
/// must lie inside the canvas; otherwise nothing is painted.
pub fn composite(canvas: &mut Canvas, sprite: &Sprite, placement: Placement) -> SynthResult<()> {
    if sprite.size() != placement.size() {
        return Err(SynthError::validation(format!(
            "composite expects sprite {} to match placement {}",
            sprite.size(),
            placement.size()
        )));
    }
    if !placement.is_within(canvas.size()) {
        return Err(SynthError::validation(format!(
            "placement {}+{}+{} leaves canvas {}",
            placement.size(),
            placement.x_offset,
            placement.y_offset,
            canvas.size()
        )));
    }

    if !placement.size().is_drawable() {
        return Ok(());
    }

    let canvas_w = canvas.size().width as usize;
    let row_bytes = placement.width as usize * 4;
    let dst: &mut [u8] = &mut canvas.rgba;
    let src = sprite.rgba().as_raw();

    for (row, src_row) in src.chunks_exact(row_bytes).enumerate() {
        let y = placement.y_offset as usize + row;
        let start = (y * canvas_w + placement.x_offset as usize) * 4;
        let dst_row = &mut dst[start..start + row_bytes];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = blend_pixel([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
