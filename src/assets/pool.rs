use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{
    assets::catalog::SpriteCatalog,
    foundation::error::{SynthError, SynthResult},
    foundation::rng::{RandomSource, choose_distinct},
};

/// What to do when fewer unused sprites remain than were asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Return whatever is left and report the shortfall.
    #[default]
    Graceful,
    /// Fail with [`SynthError::InsufficientAssets`].
    Strict,
}

/// Result of one draw from the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleOutcome {
    /// Picked sprite names, in draw order.
    pub picked: Vec<String>,
    /// How many of the requested sprites could not be supplied.
    pub shortfall: usize,
}

/// Sprites already consumed, persisted across runs as a one-name-per-line manifest.
#[derive(Clone, Debug)]
pub struct AssetPool {
    manifest: PathBuf,
    used: BTreeSet<String>,
}

impl AssetPool {
    pub fn empty(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            used: BTreeSet::new(),
        }
    }

    /// Read the manifest at `manifest`; a missing file is an empty pool.
    ///
    /// Blank lines are ignored. Entries written as full paths are reduced to
    /// their file name.
    pub fn load(manifest: impl Into<PathBuf>) -> SynthResult<Self> {
        let manifest = manifest.into();
        let text = match std::fs::read_to_string(&manifest) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(manifest = %manifest.display(), "no used-asset manifest yet");
                return Ok(Self::empty(manifest));
            }
            Err(e) => return Err(SynthError::io(&manifest, e)),
        };

        let used = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                Path::new(line)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(line)
                    .to_string()
            })
            .collect::<BTreeSet<_>>();
        tracing::debug!(manifest = %manifest.display(), used = used.len(), "loaded used-asset manifest");
        Ok(Self { manifest, used })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn used(&self) -> impl Iterator<Item = &str> {
        self.used.iter().map(String::as_str)
    }

    /// Catalog entries not yet consumed, in catalog order.
    pub fn available(&self, catalog: &SpriteCatalog) -> Vec<String> {
        catalog
            .names()
            .iter()
            .filter(|name| !self.used.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Draw up to `k` unused sprites uniformly without replacement.
    ///
    /// Does not mark anything used; call [`AssetPool::mark_used`] with the picks.
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        catalog: &SpriteCatalog,
        k: usize,
        mode: SamplingMode,
        rng: &mut R,
    ) -> SynthResult<SampleOutcome> {
        let available = self.available(catalog);
        if available.len() < k {
            if mode == SamplingMode::Strict {
                return Err(SynthError::InsufficientAssets {
                    requested: k,
                    available: available.len(),
                });
            }
            tracing::warn!(
                requested = k,
                available = available.len(),
                "sprite pool running dry, using what is left"
            );
        }

        let picked = choose_distinct(&available, k, rng);
        Ok(SampleOutcome {
            shortfall: k - picked.len(),
            picked,
        })
    }

    pub fn mark_used<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used.extend(ids.into_iter().map(Into::into));
    }

    /// Manifest text: sorted, deduplicated, newline-terminated.
    pub fn render_manifest(&self) -> String {
        let mut out = String::new();
        for id in &self.used {
            out.push_str(id);
            out.push('\n');
        }
        out
    }

    /// Rewrite the manifest with the union of all used sprites.
    pub fn persist(&self) -> SynthResult<()> {
        if let Some(parent) = self.manifest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SynthError::io(parent, e))?;
        }
        std::fs::write(&self.manifest, self.render_manifest())
            .map_err(|e| SynthError::io(&self.manifest, e))?;
        tracing::info!(
            manifest = %self.manifest.display(),
            used = self.used.len(),
            "persisted used-asset manifest"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;
