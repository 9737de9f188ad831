use std::path::Path;

use crate::{
    assets::catalog::{BACKGROUND_EXTENSIONS, list_files_with_extensions},
    corpus::layout::{CorpusLayout, Subset},
    foundation::error::{SynthError, SynthResult},
    foundation::rng::{RandomSource, shuffle},
};

/// What gets partitioned into train and val.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Generate everything into `train/`, then move a shuffled share of the outputs.
    #[default]
    Outputs,
    /// Split the backgrounds up front; variants of one background stay on one side.
    Backgrounds,
}

/// A generated image and its label, identified by file names.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct CorpusItem {
    /// Shared base name of the image and label files.
    pub stem: String,
    /// Image file name including extension.
    pub image_file: String,
}

impl CorpusItem {
    pub fn new(stem: impl Into<String>, image_file: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            image_file: image_file.into(),
        }
    }

    /// Item for an image path; `None` when the name is not valid UTF-8.
    pub fn from_image_path(path: &Path) -> Option<Self> {
        let image_file = path.file_name()?.to_str()?;
        let stem = path.file_stem()?.to_str()?;
        Some(Self::new(stem, image_file))
    }

    pub fn label_file(&self) -> String {
        format!("{}.txt", self.stem)
    }
}

/// Train/val counts after a split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SplitSummary {
    pub train: usize,
    pub val: usize,
}

/// `max(1, floor(n * ratio))` capped at `n`; zero when `n == 0` or `ratio <= 0`.
pub fn val_count(n: usize, ratio: f64) -> usize {
    if n == 0 || ratio.is_nan() || ratio <= 0.0 {
        return 0;
    }
    let raw = (n as f64 * ratio).floor() as usize;
    raw.max(1).min(n)
}

/// Shuffle `items` and cut off the last `val_count` of them.
///
/// Returns `(train, val)`.
pub fn partition<T, R: RandomSource + ?Sized>(
    mut items: Vec<T>,
    ratio: f64,
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    shuffle(&mut items, rng);
    let split_point = items.len() - val_count(items.len(), ratio);
    let val = items.split_off(split_point);
    (items, val)
}

/// Move an image and its label from `from` to `to` as one unit.
///
/// Both halves must exist and neither destination may be occupied before
/// anything moves. If the label move fails the image is moved back.
pub fn move_pair(
    layout: &CorpusLayout,
    item: &CorpusItem,
    from: Subset,
    to: Subset,
) -> SynthResult<()> {
    check_pair(layout, item, from, to)?;
    let src_image = layout.image_path(from, &item.image_file);
    let src_label = layout.label_path(from, &item.stem);
    let dst_image = layout.image_path(to, &item.image_file);
    let dst_label = layout.label_path(to, &item.stem);
    std::fs::rename(&src_image, &dst_image).map_err(|e| SynthError::io(&src_image, e))?;
    if let Err(e) = std::fs::rename(&src_label, &dst_label) {
        if let Err(undo) = std::fs::rename(&dst_image, &src_image) {
            tracing::error!(
                image = %dst_image.display(),
                error = %undo,
                "could not move image back after failed label move"
            );
        }
        return Err(SynthError::io(&src_label, e));
    }
    tracing::debug!(item = %item.stem, from = from.as_str(), to = to.as_str(), "moved pair");
    Ok(())
}

fn check_pair(layout: &CorpusLayout, item: &CorpusItem, from: Subset, to: Subset) -> SynthResult<()> {
    for path in [
        layout.image_path(from, &item.image_file),
        layout.label_path(from, &item.stem),
    ] {
        if !path.is_file() {
            return Err(SynthError::MissingPair { path });
        }
    }
    for path in [
        layout.image_path(to, &item.image_file),
        layout.label_path(to, &item.stem),
    ] {
        if path.exists() {
            return Err(SynthError::PairExists { path });
        }
    }
    Ok(())
}

/// Split freshly generated `items` (all currently in `train/`) by moving the val share.
///
/// Nothing moves unless every val pair is complete and its `val/` slot is free.
pub fn split_items<R: RandomSource + ?Sized>(
    layout: &CorpusLayout,
    items: Vec<CorpusItem>,
    ratio: f64,
    rng: &mut R,
) -> SynthResult<SplitSummary> {
    let total = items.len();
    let (train, val) = partition(items, ratio, rng);

    for item in &val {
        check_pair(layout, item, Subset::Train, Subset::Val)?;
    }
    for item in &val {
        move_pair(layout, item, Subset::Train, Subset::Val)?;
    }

    tracing::info!(total, train = train.len(), val = val.len(), "split corpus");
    Ok(SplitSummary {
        train: train.len(),
        val: val.len(),
    })
}

/// Images currently in `subset`, sorted by file name.
pub fn scan_subset(layout: &CorpusLayout, subset: Subset) -> SynthResult<Vec<CorpusItem>> {
    let dir = layout.images_dir(subset);
    let mut items = Vec::new();
    for path in list_files_with_extensions(&dir, BACKGROUND_EXTENSIONS)? {
        match CorpusItem::from_image_path(&path) {
            Some(item) => items.push(item),
            None => tracing::warn!(path = %path.display(), "skipping image with non-UTF-8 name"),
        }
    }
    Ok(items)
}

/// Split whatever currently sits in `train/` of an existing corpus.
pub fn split_existing<R: RandomSource + ?Sized>(
    layout: &CorpusLayout,
    ratio: f64,
    rng: &mut R,
) -> SynthResult<SplitSummary> {
    let items = scan_subset(layout, Subset::Train)?;
    if items.is_empty() {
        return Err(SynthError::empty_corpus(format!(
            "no images under '{}'",
            layout.images_dir(Subset::Train).display()
        )));
    }
    std::fs::create_dir_all(layout.images_dir(Subset::Val))
        .and_then(|_| std::fs::create_dir_all(layout.labels_dir(Subset::Val)))
        .map_err(|e| SynthError::io(layout.root(), e))?;
    split_items(layout, items, ratio, rng)
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/split.rs"]
mod tests;
