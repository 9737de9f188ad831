use std::path::{Path, PathBuf};

use crate::{
    assets::pool::SamplingMode,
    corpus::layout::CorpusLayout,
    corpus::split::SplitStrategy,
    foundation::error::{SynthError, SynthResult},
    render::placement::{PlacementPolicy, ScaleMode},
};

/// Default file name of the used-asset manifest at the destination root.
pub const DEFAULT_MANIFEST_NAME: &str = "used_assets.txt";

/// Everything one generation run needs. Missing JSON fields take the defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    pub background_dir: PathBuf,
    pub sprite_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub variants_per_background: u32,
    pub sprites_per_variant: usize,
    pub max_dimension_ratio: f64,
    pub val_split_ratio: f64,
    pub scale_mode: ScaleMode,
    pub sampling: SamplingMode,
    pub split_strategy: SplitStrategy,
    /// Seeds `CorpusBuilder::rng`; OS entropy when absent.
    pub seed: Option<u64>,
    pub manifest_name: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            background_dir: PathBuf::from("backgrounds"),
            sprite_dir: PathBuf::from("sprites"),
            destination_dir: PathBuf::from("dataset"),
            variants_per_background: 3,
            sprites_per_variant: 3,
            max_dimension_ratio: 0.5,
            val_split_ratio: 0.25,
            scale_mode: ScaleMode::Fit,
            sampling: SamplingMode::Graceful,
            split_strategy: SplitStrategy::Outputs,
            seed: None,
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }
}

impl CorpusConfig {
    pub fn from_json_str(s: &str) -> SynthResult<Self> {
        serde_json::from_str(s).map_err(|e| SynthError::serde(e.to_string()))
    }

    pub fn from_file(path: &Path) -> SynthResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SynthError::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> SynthResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SynthError::serde(e.to_string()))
    }

    pub fn validate(&self) -> SynthResult<()> {
        if self.variants_per_background == 0 {
            return Err(SynthError::validation(
                "variants_per_background must be >= 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.val_split_ratio) {
            return Err(SynthError::validation(format!(
                "val_split_ratio must be within [0, 1], got {}",
                self.val_split_ratio
            )));
        }
        let name = Path::new(&self.manifest_name);
        if self.manifest_name.trim().is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(SynthError::validation(format!(
                "manifest_name must be a plain file name, got '{}'",
                self.manifest_name
            )));
        }
        self.placement_policy().map(|_| ())
    }

    pub fn placement_policy(&self) -> SynthResult<PlacementPolicy> {
        PlacementPolicy::new(self.max_dimension_ratio, self.scale_mode)
    }

    pub fn layout(&self) -> CorpusLayout {
        CorpusLayout::new(&self.destination_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.destination_dir.join(&self.manifest_name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/config.rs"]
mod tests;
