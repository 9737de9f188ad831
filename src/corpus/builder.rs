use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::catalog::{BACKGROUND_EXTENSIONS, SpriteCatalog, list_files_with_extensions},
    assets::decode::{Sprite, load_background, load_sprite},
    assets::pool::AssetPool,
    corpus::config::CorpusConfig,
    corpus::layout::{CorpusLayout, Subset},
    corpus::split::{CorpusItem, SplitStrategy, SplitSummary, partition, split_items},
    foundation::error::{SynthError, SynthResult},
    foundation::rng::{RandomSource, SeededRandom},
    labels::yolo::{DetectionLabel, write_label_file},
    render::composite::{Canvas, composite},
    render::placement::PlacementPolicy,
};

/// Counters for one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CorpusReport {
    pub seed: Option<u64>,
    pub backgrounds_found: usize,
    pub backgrounds_skipped: usize,
    pub images_written: usize,
    pub sprites_placed: usize,
    pub sprites_unreadable: usize,
    pub sprites_infeasible: usize,
    /// Sprites requested but not supplied because the pool ran dry.
    pub sprite_shortfall: usize,
    pub train_count: usize,
    pub val_count: usize,
}

/// Outcome of [`CorpusBuilder::run`]: the report plus the updated pool.
#[derive(Debug)]
pub struct CorpusRun {
    pub report: CorpusReport,
    pub pool: AssetPool,
}

/// Scale, place, blend and label one sprite on `canvas`.
///
/// Fails with [`SynthError::PlacementInfeasible`] (canvas untouched) when the
/// sprite cannot fit even after scaling.
pub fn paste_sprite<R: RandomSource + ?Sized>(
    canvas: &mut Canvas,
    sprite: &Sprite,
    policy: &PlacementPolicy,
    rng: &mut R,
) -> SynthResult<DetectionLabel> {
    let canvas_size = canvas.size();
    let placement = policy.place(sprite.size(), canvas_size, rng)?;
    let scaled = sprite.scaled_to(placement.size());
    composite(canvas, &scaled, placement)?;
    tracing::debug!(
        x = placement.x_offset,
        y = placement.y_offset,
        w = placement.width,
        h = placement.height,
        "pasted sprite"
    );
    DetectionLabel::emit(placement, canvas_size)
}

/// Drives sampling, compositing, labeling and the train/val split over a
/// directory of backgrounds.
#[derive(Clone, Debug)]
pub struct CorpusBuilder {
    config: CorpusConfig,
    policy: PlacementPolicy,
}

impl CorpusBuilder {
    pub fn new(config: CorpusConfig) -> SynthResult<Self> {
        config.validate()?;
        let policy = config.placement_policy()?;
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn layout(&self) -> CorpusLayout {
        self.config.layout()
    }

    /// Random source for [`CorpusBuilder::run`]: seeded from the config, or
    /// from OS entropy when no seed is set. Read the chosen seed back with
    /// [`SeededRandom::seed`].
    pub fn rng(&self) -> SeededRandom {
        match self.config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        }
    }

    /// Generate the whole corpus.
    ///
    /// Unreadable sprites and backgrounds and infeasible placements are logged
    /// and skipped. Missing or entirely unreadable inputs abort before any
    /// directory is created. The pool is persisted once, after generation, and
    /// returned.
    #[tracing::instrument(skip_all, fields(dest = %self.config.destination_dir.display()))]
    pub fn run<R: RandomSource + ?Sized>(
        &self,
        mut pool: AssetPool,
        rng: &mut R,
    ) -> SynthResult<CorpusRun> {
        let listed =
            list_files_with_extensions(&self.config.background_dir, BACKGROUND_EXTENSIONS)?;
        if listed.is_empty() {
            return Err(SynthError::empty_corpus(format!(
                "no background images in '{}'",
                self.config.background_dir.display()
            )));
        }
        let catalog = SpriteCatalog::scan(&self.config.sprite_dir)?;
        if catalog.is_empty() {
            return Err(SynthError::empty_corpus(format!(
                "no sprite images in '{}'",
                self.config.sprite_dir.display()
            )));
        }

        let mut report = CorpusReport {
            backgrounds_found: listed.len(),
            ..CorpusReport::default()
        };
        let backgrounds = screen_backgrounds(listed, &mut report);
        if backgrounds.is_empty() {
            return Err(SynthError::empty_corpus(format!(
                "none of the {} background images in '{}' could be read",
                report.backgrounds_found,
                self.config.background_dir.display()
            )));
        }

        let unused = pool.available(&catalog).len();
        tracing::info!(
            backgrounds = backgrounds.len(),
            sprites = catalog.len(),
            unused,
            "starting corpus generation"
        );
        if unused == 0 {
            tracing::warn!("every sprite is already marked used; variants will carry no labels");
        }

        let layout = self.layout();
        layout.create()?;

        let assignments = self.assign_subsets(backgrounds, rng);
        let generated = self.generate_all(&assignments, &catalog, &mut pool, rng, &mut report);

        // Whatever was consumed before a failure is still recorded.
        pool.persist()?;
        let items = generated?;
        if items.is_empty() {
            return Err(SynthError::empty_corpus(format!(
                "no background in '{}' produced an image",
                self.config.background_dir.display()
            )));
        }

        let summary = match self.config.split_strategy {
            SplitStrategy::Outputs => {
                let train_items: Vec<CorpusItem> =
                    items.into_iter().map(|(_, item)| item).collect();
                split_items(&layout, train_items, self.config.val_split_ratio, rng)?
            }
            SplitStrategy::Backgrounds => {
                let val = items.iter().filter(|(s, _)| *s == Subset::Val).count();
                SplitSummary {
                    train: items.len() - val,
                    val,
                }
            }
        };
        report.train_count = summary.train;
        report.val_count = summary.val;

        tracing::info!(
            images = report.images_written,
            placed = report.sprites_placed,
            skipped_backgrounds = report.backgrounds_skipped,
            train = report.train_count,
            val = report.val_count,
            "corpus generation finished"
        );
        Ok(CorpusRun { report, pool })
    }

    fn assign_subsets<R: RandomSource + ?Sized>(
        &self,
        backgrounds: Vec<Background>,
        rng: &mut R,
    ) -> Vec<(Subset, Background)> {
        match self.config.split_strategy {
            SplitStrategy::Outputs => backgrounds
                .into_iter()
                .map(|bg| (Subset::Train, bg))
                .collect(),
            SplitStrategy::Backgrounds => {
                let (train, val) = partition(backgrounds, self.config.val_split_ratio, rng);
                tracing::info!(
                    train = train.len(),
                    val = val.len(),
                    "split backgrounds before generation"
                );
                train
                    .into_iter()
                    .map(|bg| (Subset::Train, bg))
                    .chain(val.into_iter().map(|bg| (Subset::Val, bg)))
                    .collect()
            }
        }
    }

    fn generate_all<R: RandomSource + ?Sized>(
        &self,
        assignments: &[(Subset, Background)],
        catalog: &SpriteCatalog,
        pool: &mut AssetPool,
        rng: &mut R,
        report: &mut CorpusReport,
    ) -> SynthResult<Vec<(Subset, CorpusItem)>> {
        let layout = self.layout();
        let mut items = Vec::new();

        for (idx, (subset, bg)) in assignments.iter().enumerate() {
            tracing::info!(
                "composing background {}/{}: {}",
                idx + 1,
                assignments.len(),
                bg.path.display()
            );
            // Screened already; a file that changed on disk since is skipped.
            let background = match load_background(&bg.path) {
                Ok(canvas) => canvas,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping background");
                    report.backgrounds_skipped += 1;
                    continue;
                }
            };

            for variant in 1..=self.config.variants_per_background {
                let item = CorpusItem::new(
                    format!("{}_{variant}", bg.stem),
                    format!("{}_{variant}{}", bg.stem, bg.ext),
                );
                let (canvas, labels) =
                    self.compose_variant(background.clone(), catalog, pool, rng, report)?;
                write_label_file(&layout.label_path(*subset, &item.stem), &labels)?;
                save_rgb(canvas, &layout.image_path(*subset, &item.image_file))?;
                report.images_written += 1;
                items.push((*subset, item));
            }
        }
        Ok(items)
    }

    /// One variant: sample sprites, paste the ones that load and fit, collect labels.
    ///
    /// Every sampled sprite is marked used, including ones that were then skipped.
    pub fn compose_variant<R: RandomSource + ?Sized>(
        &self,
        mut canvas: Canvas,
        catalog: &SpriteCatalog,
        pool: &mut AssetPool,
        rng: &mut R,
        report: &mut CorpusReport,
    ) -> SynthResult<(Canvas, Vec<DetectionLabel>)> {
        let outcome = pool.sample(
            catalog,
            self.config.sprites_per_variant,
            self.config.sampling,
            rng,
        )?;
        report.sprite_shortfall += outcome.shortfall;

        let mut labels = Vec::with_capacity(outcome.picked.len());
        for name in &outcome.picked {
            let pasted = load_sprite(&catalog.path_of(name))
                .and_then(|sprite| paste_sprite(&mut canvas, &sprite, &self.policy, rng));
            match pasted {
                Ok(label) => {
                    labels.push(label);
                    report.sprites_placed += 1;
                }
                Err(e) if e.is_sprite_local() => {
                    tracing::warn!(sprite = %name, error = %e, "skipping sprite");
                    if matches!(e, SynthError::SpriteUnreadable { .. }) {
                        report.sprites_unreadable += 1;
                    } else {
                        report.sprites_infeasible += 1;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        pool.mark_used(outcome.picked);
        Ok((canvas, labels))
    }
}

/// A background that passed screening, with its output naming parts.
#[derive(Clone, Debug)]
struct Background {
    path: PathBuf,
    stem: String,
    ext: String,
}

/// Keep the backgrounds that will produce output: UTF-8 names, contents that
/// decode, and a base name no earlier usable background took.
fn screen_backgrounds(paths: Vec<PathBuf>, report: &mut CorpusReport) -> Vec<Background> {
    let mut stems_taken = HashSet::new();
    let mut usable = Vec::with_capacity(paths.len());
    for path in paths {
        let Some((stem, ext)) = stem_and_ext(&path) else {
            tracing::warn!(path = %path.display(), "skipping background with non-UTF-8 name");
            report.backgrounds_skipped += 1;
            continue;
        };
        if stems_taken.contains(&stem) {
            tracing::warn!(
                path = %path.display(),
                "another background already uses this base name, skipping"
            );
            report.backgrounds_skipped += 1;
            continue;
        }
        if let Err(e) = load_background(&path) {
            tracing::warn!(error = %e, "skipping background");
            report.backgrounds_skipped += 1;
            continue;
        }
        stems_taken.insert(stem.clone());
        usable.push(Background { path, stem, ext });
    }
    usable
}

fn stem_and_ext(path: &Path) -> Option<(String, String)> {
    let stem = path.file_stem()?.to_str()?.to_string();
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some((stem, format!(".{ext}")))
}

fn save_rgb(canvas: Canvas, path: &Path) -> SynthResult<()> {
    canvas
        .finalize()
        .save(path)
        .with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/corpus/builder.rs"]
mod tests;
