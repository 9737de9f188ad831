use crate::{
    foundation::core::{Placement, Size},
    foundation::error::{SynthError, SynthResult},
    foundation::rng::RandomSource,
};

/// How an oversized sprite is brought down to size.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Uniform shrink by the binding axis so both sides fit the ratio cap.
    #[default]
    Fit,
    /// Height becomes this fraction of the canvas height, width follows the aspect ratio.
    CanvasHeightFraction(f64),
}

/// Sizing and positioning rules for sprites on one canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPolicy {
    max_dimension_ratio: f64,
    scale_mode: ScaleMode,
}

impl PlacementPolicy {
    pub fn new(max_dimension_ratio: f64, scale_mode: ScaleMode) -> SynthResult<Self> {
        if !max_dimension_ratio.is_finite() || max_dimension_ratio <= 0.0 {
            return Err(SynthError::validation(format!(
                "max_dimension_ratio must be finite and > 0, got {max_dimension_ratio}"
            )));
        }
        if let ScaleMode::CanvasHeightFraction(f) = scale_mode {
            if !f.is_finite() || f <= 0.0 {
                return Err(SynthError::validation(format!(
                    "canvas_height_fraction must be finite and > 0, got {f}"
                )));
            }
        }
        Ok(Self {
            max_dimension_ratio,
            scale_mode,
        })
    }

    pub fn max_dimension_ratio(&self) -> f64 {
        self.max_dimension_ratio
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Whether either side of `sprite` is above `ratio * canvas side`.
    pub fn exceeds_cap(&self, sprite: Size, canvas: Size) -> bool {
        f64::from(sprite.width) > self.max_dimension_ratio * f64::from(canvas.width)
            || f64::from(sprite.height) > self.max_dimension_ratio * f64::from(canvas.height)
    }

    /// Final sprite size on `canvas`. Sprites under the cap keep their size.
    pub fn scaled_size(&self, sprite: Size, canvas: Size) -> Size {
        if !sprite.is_drawable() || !self.exceeds_cap(sprite, canvas) {
            return sprite;
        }
        let (w, h) = (f64::from(sprite.width), f64::from(sprite.height));
        match self.scale_mode {
            ScaleMode::Fit => {
                let width_scale = self.max_dimension_ratio * f64::from(canvas.width) / w;
                let height_scale = self.max_dimension_ratio * f64::from(canvas.height) / h;
                let s = width_scale.min(height_scale);
                Size::new(floor_px(w * s), floor_px(h * s))
            }
            ScaleMode::CanvasHeightFraction(f) => {
                let new_h = floor_px(f64::from(canvas.height) * f);
                let new_w = floor_px(w / h * f64::from(new_h));
                Size::new(new_w, new_h)
            }
        }
    }

    /// Scale `sprite` and draw a uniform top-left offset that keeps it inside `canvas`.
    ///
    /// Fails with [`SynthError::PlacementInfeasible`] when the scaled sprite is
    /// still wider or taller than the canvas.
    pub fn place<R: RandomSource + ?Sized>(
        &self,
        sprite: Size,
        canvas: Size,
        rng: &mut R,
    ) -> SynthResult<Placement> {
        let size = self.scaled_size(sprite, canvas);
        if !size.is_drawable() || !size.fits_within(canvas) {
            return Err(SynthError::PlacementInfeasible {
                sprite_w: size.width,
                sprite_h: size.height,
                canvas_w: canvas.width,
                canvas_h: canvas.height,
            });
        }
        let x_offset = rng.uniform_inclusive(canvas.width - size.width);
        let y_offset = rng.uniform_inclusive(canvas.height - size.height);
        Placement::new(x_offset, y_offset, size.width, size.height, canvas)
    }
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            max_dimension_ratio: 0.5,
            scale_mode: ScaleMode::Fit,
        }
    }
}

// Tolerates products like 399.99999999999994 that should land on an integer.
fn floor_px(v: f64) -> u32 {
    let px = (v + 1e-9).floor();
    if px < 1.0 {
        1
    } else if px >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        px as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placement.rs"]
mod tests;
