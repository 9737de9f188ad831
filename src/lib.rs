//! cutout-synth builds object-detection training sets by pasting transparent
//! cutouts onto background photos.
//!
//! The public API is corpus-oriented:
//!
//! - Load and validate a [`CorpusConfig`]
//! - Load the persistent [`AssetPool`] of already-consumed sprites
//! - Run a [`CorpusBuilder`] to write images, YOLO labels and the train/val split
//!
//! The lower layers (placement, compositing, label emission) are exported for
//! callers that want to drive single variants themselves.
#![forbid(unsafe_code)]

mod assets;
mod corpus;
mod foundation;
mod labels;
/// Input preparation helpers (background keying, square resizing).
pub mod prep;
mod render;

pub use crate::foundation::core::{Placement, Size};
pub use crate::foundation::error::{SynthError, SynthResult};
pub use crate::foundation::rng::{RandomSource, SeededRandom, choose_distinct, shuffle};

pub use crate::assets::catalog::{
    BACKGROUND_EXTENSIONS, RESIZE_EXTENSIONS, SPRITE_EXTENSIONS, SpriteCatalog, has_extension,
    list_files_with_extensions,
};
pub use crate::assets::decode::{
    Sprite, decode_background, decode_sprite, load_background, load_sprite,
};
pub use crate::assets::pool::{AssetPool, SampleOutcome, SamplingMode};

pub use crate::render::composite::{Canvas, blend_channel, blend_pixel, composite};
pub use crate::render::placement::{PlacementPolicy, ScaleMode};

pub use crate::labels::yolo::{
    DetectionLabel, LABELS_DIR, SPRITE_CLASS_ID, label_path_for, parse_label_line,
    read_label_file, render_labels, write_label_file,
};

pub use crate::corpus::builder::{CorpusBuilder, CorpusReport, CorpusRun, paste_sprite};
pub use crate::corpus::config::{CorpusConfig, DEFAULT_MANIFEST_NAME};
pub use crate::corpus::layout::{CorpusLayout, IMAGES_DIR, Subset};
pub use crate::corpus::split::{
    CorpusItem, SplitStrategy, SplitSummary, move_pair, partition, scan_subset, split_existing,
    split_items, val_count,
};

pub use crate::prep::{PrepSummary, resize_to_square, strip_light_background};
