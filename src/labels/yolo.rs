use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use crate::{
    foundation::core::{Placement, Size},
    foundation::error::{SynthError, SynthResult},
};

/// The single foreground class.
pub const SPRITE_CLASS_ID: u32 = 0;

/// Directory name holding label files, sibling of the `images` directory.
pub const LABELS_DIR: &str = "labels";

/// One normalized detection box: center and size as fractions of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DetectionLabel {
    pub class_id: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl DetectionLabel {
    /// Normalize `placement` by `canvas`. Every component lands in (0,1].
    pub fn emit(placement: Placement, canvas: Size) -> SynthResult<Self> {
        if !canvas.is_drawable() || !placement.size().is_drawable() {
            return Err(SynthError::validation(format!(
                "cannot label placement {} on canvas {canvas}",
                placement.size()
            )));
        }
        if !placement.is_within(canvas) {
            return Err(SynthError::validation(format!(
                "placement {}+{}+{} leaves canvas {canvas}",
                placement.size(),
                placement.x_offset,
                placement.y_offset
            )));
        }
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        let (w, h) = (f64::from(placement.width), f64::from(placement.height));
        Ok(Self {
            class_id: SPRITE_CLASS_ID,
            center_x: (f64::from(placement.x_offset) + w / 2.0) / cw,
            center_y: (f64::from(placement.y_offset) + h / 2.0) / ch,
            width: w / cw,
            height: h / ch,
        })
    }

    /// `"<class> <cx> <cy> <w> <h>"` with six decimals, no trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.center_x, self.center_y, self.width, self.height
        )
    }

    /// Back to pixel geometry on `canvas`, rounded to the nearest pixel.
    pub fn to_pixels(&self, canvas: Size) -> Placement {
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        let width = (self.width * cw).round();
        let height = (self.height * ch).round();
        Placement {
            x_offset: (self.center_x * cw - width / 2.0).round().max(0.0) as u32,
            y_offset: (self.center_y * ch - height / 2.0).round().max(0.0) as u32,
            width: width.max(0.0) as u32,
            height: height.max(0.0) as u32,
        }
    }
}

/// Label file text for one image, one line per label in placement order.
pub fn render_labels(labels: &[DetectionLabel]) -> String {
    let mut out = String::new();
    for label in labels {
        let _ = writeln!(out, "{}", label.to_line());
    }
    out
}

/// Parse one label line. Blank lines yield `None`; `line_no` is 1-based.
pub fn parse_label_line(line: &str, line_no: usize) -> SynthResult<Option<DetectionLabel>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
    if tokens.len() != 5 {
        return Err(SynthError::label_parse(
            line_no,
            format!("expected 5 tokens, found {}", tokens.len()),
        ));
    }

    let class_id = tokens[0].parse::<u32>().map_err(|_| {
        SynthError::label_parse(
            line_no,
            format!("invalid class id '{}'; expected non-negative integer", tokens[0]),
        )
    })?;
    let field = |idx: usize, name: &str| -> SynthResult<f64> {
        tokens[idx]
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                SynthError::label_parse(line_no, format!("invalid {name} '{}'", tokens[idx]))
            })
    };

    Ok(Some(DetectionLabel {
        class_id,
        center_x: field(1, "center_x")?,
        center_y: field(2, "center_y")?,
        width: field(3, "width")?,
        height: field(4, "height")?,
    }))
}

pub fn read_label_file(path: &Path) -> SynthResult<Vec<DetectionLabel>> {
    let text = std::fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
    let mut labels = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(label) = parse_label_line(line, idx + 1)? {
            labels.push(label);
        }
    }
    Ok(labels)
}

/// Write `labels` to `path`. An empty slice produces an empty file.
pub fn write_label_file(path: &Path, labels: &[DetectionLabel]) -> SynthResult<()> {
    std::fs::write(path, render_labels(labels)).map_err(|e| SynthError::io(path, e))
}

/// `<root>/images/name.ext` maps to `<root>/labels/name.txt`.
pub fn label_path_for(image_path: &Path) -> PathBuf {
    let images_dir = image_path.parent().unwrap_or_else(|| Path::new(""));
    let root = images_dir.parent().unwrap_or_else(|| Path::new(""));
    let stem = image_path.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".txt");
    root.join(LABELS_DIR).join(name)
}

#[cfg(test)]
#[path = "../../tests/unit/labels/yolo.rs"]
mod tests;
