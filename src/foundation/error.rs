use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type SynthResult<T> = Result<T, SynthError>;

/// Top-level error taxonomy used by the corpus APIs.
///
/// Per-sprite and per-background variants are recovered by the corpus builder
/// (logged and skipped); the remaining variants abort the operation that
/// produced them.
#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    /// Invalid configuration or buffer geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Strict sampling could not supply the requested number of unused sprites.
    #[error("asset pool error: requested {requested} unused sprites, only {available} remain")]
    InsufficientAssets {
        /// Number of sprites asked for.
        requested: usize,
        /// Number of unused sprites left in the catalog.
        available: usize,
    },

    /// A sprite file could not be decoded.
    #[error("sprite error: cannot read '{}': {reason}", path.display())]
    SpriteUnreadable {
        /// Offending sprite path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A background file could not be decoded.
    #[error("background error: cannot read '{}': {reason}", path.display())]
    BackgroundUnreadable {
        /// Offending background path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// A sprite does not fit the canvas even after scaling.
    #[error(
        "placement error: sprite {sprite_w}x{sprite_h} does not fit canvas {canvas_w}x{canvas_h}"
    )]
    PlacementInfeasible {
        /// Sprite width after scaling.
        sprite_w: u32,
        /// Sprite height after scaling.
        sprite_h: u32,
        /// Canvas width.
        canvas_w: u32,
        /// Canvas height.
        canvas_h: u32,
    },

    /// No usable inputs were found, nothing was generated.
    #[error("empty corpus: {0}")]
    EmptyCorpus(String),

    /// A label line did not match `<class> <cx> <cy> <w> <h>`.
    #[error("label parse error: line {line}: {message}")]
    LabelParse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// One half of an image/label pair is missing.
    #[error("split error: missing pair file '{}'", path.display())]
    MissingPair {
        /// The file that was expected but not found.
        path: PathBuf,
    },

    /// The destination of a split move is already occupied.
    #[error("split error: destination '{}' already exists", path.display())]
    PairExists {
        /// The occupied destination file.
        path: PathBuf,
    },

    /// Errors when serializing or deserializing config or reports.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failure with the path it happened on.
    #[error("io error: '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SynthError {
    /// Build a [`SynthError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SynthError::EmptyCorpus`] value.
    pub fn empty_corpus(msg: impl Into<String>) -> Self {
        Self::EmptyCorpus(msg.into())
    }

    /// Build a [`SynthError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SynthError::Io`] value tagged with `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`SynthError::LabelParse`] value.
    pub fn label_parse(line: usize, msg: impl Into<String>) -> Self {
        Self::LabelParse {
            line,
            message: msg.into(),
        }
    }

    /// True for failures the corpus builder recovers from by skipping one sprite.
    pub fn is_sprite_local(&self) -> bool {
        matches!(
            self,
            Self::SpriteUnreadable { .. } | Self::PlacementInfeasible { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
