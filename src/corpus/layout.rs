use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{SynthError, SynthResult},
    labels::yolo::LABELS_DIR,
};

pub const IMAGES_DIR: &str = "images";

/// One side of the train/val partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subset {
    Train,
    Val,
}

impl Subset {
    pub fn as_str(self) -> &'static str {
        match self {
            Subset::Train => "train",
            Subset::Val => "val",
        }
    }
}

/// `<root>/{train,val}/{images,labels}` output tree.
#[derive(Clone, Debug)]
pub struct CorpusLayout {
    root: PathBuf,
}

impl CorpusLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self, subset: Subset) -> PathBuf {
        self.root.join(subset.as_str()).join(IMAGES_DIR)
    }

    pub fn labels_dir(&self, subset: Subset) -> PathBuf {
        self.root.join(subset.as_str()).join(LABELS_DIR)
    }

    pub fn image_path(&self, subset: Subset, image_file: &str) -> PathBuf {
        self.images_dir(subset).join(image_file)
    }

    pub fn label_path(&self, subset: Subset, stem: &str) -> PathBuf {
        self.labels_dir(subset).join(format!("{stem}.txt"))
    }

    /// Create all four leaf directories.
    pub fn create(&self) -> SynthResult<()> {
        for subset in [Subset::Train, Subset::Val] {
            for dir in [self.images_dir(subset), self.labels_dir(subset)] {
                std::fs::create_dir_all(&dir).map_err(|e| SynthError::io(&dir, e))?;
            }
        }
        Ok(())
    }
}
