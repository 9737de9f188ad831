use crate::foundation::error::{SynthError, SynthResult};

/// Pixel dimensions of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides non-zero.
    pub fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn fits_within(self, outer: Size) -> bool {
        self.width <= outer.width && self.height <= outer.height
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Sprite rectangle in canvas pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Build a placement, rejecting any rectangle that leaves `canvas`.
    pub fn new(
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        canvas: Size,
    ) -> SynthResult<Self> {
        let p = Self {
            x_offset,
            y_offset,
            width,
            height,
        };
        if !p.is_within(canvas) {
            return Err(SynthError::validation(format!(
                "placement {}x{}+{}+{} exceeds canvas {canvas}",
                width, height, x_offset, y_offset
            )));
        }
        Ok(p)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `x + w <= W` and `y + h <= H`, computed without overflow.
    pub fn is_within(self, canvas: Size) -> bool {
        u64::from(self.x_offset) + u64::from(self.width) <= u64::from(canvas.width)
            && u64::from(self.y_offset) + u64::from(self.height) <= u64::from(canvas.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
