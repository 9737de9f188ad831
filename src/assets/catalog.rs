use std::path::{Path, PathBuf};

use crate::foundation::error::{SynthError, SynthResult};

/// Extensions accepted as backgrounds (compared case-insensitively).
pub const BACKGROUND_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Extensions accepted as sprites.
pub const SPRITE_EXTENSIONS: &[&str] = &["png"];

/// Extensions accepted by the resize tool.
pub const RESIZE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff"];

pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

/// Regular files directly under `dir` whose extension is in `allowed`, sorted by path.
pub fn list_files_with_extensions(dir: &Path, allowed: &[&str]) -> SynthResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SynthError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SynthError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, allowed) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The sprites available in one directory, identified by file name.
#[derive(Clone, Debug)]
pub struct SpriteCatalog {
    dir: PathBuf,
    names: Vec<String>,
}

impl SpriteCatalog {
    /// List the PNG files in `dir`. Names are sorted so seeded sampling is reproducible.
    pub fn scan(dir: impl Into<PathBuf>) -> SynthResult<Self> {
        let dir = dir.into();
        let mut names = Vec::new();
        for path in list_files_with_extensions(&dir, SPRITE_EXTENSIONS)? {
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => names.push(name.to_string()),
                None => tracing::warn!(path = %path.display(), "skipping sprite with non-UTF-8 name"),
            }
        }
        Ok(Self { dir, names })
    }

    pub fn from_names(dir: impl Into<PathBuf>, mut names: Vec<String>) -> Self {
        names.sort();
        names.dedup();
        Self {
            dir: dir.into(),
            names,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
