use super::*;
use crate::assets::pool::SamplingMode;
use crate::foundation::core::Size;
use crate::foundation::rng::SeededRandom;
use crate::render::placement::ScaleMode;

fn write_sprite(dir: &Path, name: &str, w: u32, h: u32) {
    image::RgbaImage::from_pixel(w, h, image::Rgba([0, 200, 0, 255]))
        .save(dir.join(name))
        .unwrap();
}

fn builder_for(dir: &Path, sampling: SamplingMode) -> CorpusBuilder {
    CorpusBuilder::new(CorpusConfig {
        background_dir: dir.join("bg"),
        sprite_dir: dir.join("sprites"),
        destination_dir: dir.join("out"),
        sampling,
        ..CorpusConfig::default()
    })
    .unwrap()
}

#[test]
fn wide_sprite_is_scaled_and_labeled() {
    let mut canvas = Canvas::filled(Size::new(800, 600), [0, 0, 0]);
    let sprite = Sprite::from_rgba(image::RgbaImage::from_pixel(
        1000,
        100,
        image::Rgba([255, 255, 255, 255]),
    ));
    let policy = PlacementPolicy::new(0.5, ScaleMode::Fit).unwrap();

    let label = paste_sprite(&mut canvas, &sprite, &policy, &mut SeededRandom::new(5)).unwrap();
    assert!((label.width - 0.5).abs() < 1e-9);
    assert!((label.height - 40.0 / 600.0).abs() < 1e-9);

    let painted = canvas
        .rgba()
        .pixels()
        .filter(|p| p.0[0] > 200)
        .count();
    assert_eq!(painted, 400 * 40);
}

#[test]
fn infeasible_sprite_leaves_canvas_untouched() {
    let mut canvas = Canvas::filled(Size::new(80, 60), [9, 9, 9]);
    let sprite = Sprite::from_rgba(image::RgbaImage::from_pixel(
        100,
        10,
        image::Rgba([255, 255, 255, 255]),
    ));
    let policy = PlacementPolicy::new(2.0, ScaleMode::Fit).unwrap();

    let err = paste_sprite(&mut canvas, &sprite, &policy, &mut SeededRandom::new(5)).unwrap_err();
    assert!(matches!(err, SynthError::PlacementInfeasible { .. }));
    assert!(canvas.rgba().pixels().all(|p| p.0 == [9, 9, 9, 255]));
}

#[test]
fn compose_variant_skips_unreadable_sprite_but_marks_it_used() {
    let dir = tempfile::tempdir().unwrap();
    let sprites = dir.path().join("sprites");
    std::fs::create_dir_all(&sprites).unwrap();
    write_sprite(&sprites, "good.png", 10, 10);
    std::fs::write(sprites.join("broken.png"), b"not a png").unwrap();

    let builder = builder_for(dir.path(), SamplingMode::Graceful);
    let catalog = SpriteCatalog::scan(&sprites).unwrap();
    let mut pool = AssetPool::empty(dir.path().join("m.txt"));
    let mut report = CorpusReport::default();

    let (_, labels) = builder
        .compose_variant(
            Canvas::filled(Size::new(100, 100), [0, 0, 0]),
            &catalog,
            &mut pool,
            &mut SeededRandom::new(1),
            &mut report,
        )
        .unwrap();

    assert_eq!(labels.len(), 1);
    assert_eq!(report.sprites_placed, 1);
    assert_eq!(report.sprites_unreadable, 1);
    assert_eq!(report.sprite_shortfall, 1);
    assert!(pool.is_used("good.png"));
    assert!(pool.is_used("broken.png"));
}

#[test]
fn compose_variant_strict_shortfall_fails() {
    let dir = tempfile::tempdir().unwrap();
    let sprites = dir.path().join("sprites");
    std::fs::create_dir_all(&sprites).unwrap();
    write_sprite(&sprites, "only.png", 4, 4);

    let builder = builder_for(dir.path(), SamplingMode::Strict);
    let catalog = SpriteCatalog::scan(&sprites).unwrap();
    let mut pool = AssetPool::empty(dir.path().join("m.txt"));

    let err = builder
        .compose_variant(
            Canvas::filled(Size::new(20, 20), [0, 0, 0]),
            &catalog,
            &mut pool,
            &mut SeededRandom::new(1),
            &mut CorpusReport::default(),
        )
        .unwrap_err();
    assert!(matches!(err, SynthError::InsufficientAssets { .. }));
    assert_eq!(pool.used_count(), 0);
}

#[test]
fn stem_and_ext_lowercases_extension() {
    assert_eq!(
        stem_and_ext(Path::new("dir/Forest.Day.JPG")),
        Some(("Forest.Day".to_string(), ".jpg".to_string()))
    );
}

#[test]
fn rng_follows_configured_seed() {
    let dir = tempfile::tempdir().unwrap();
    let seeded = CorpusBuilder::new(CorpusConfig {
        seed: Some(1234),
        destination_dir: dir.path().join("out"),
        ..CorpusConfig::default()
    })
    .unwrap();
    let (mut a, mut b) = (seeded.rng(), seeded.rng());
    assert_eq!(a.seed(), 1234);
    assert_eq!(a.index(1000), b.index(1000));

    let unseeded = builder_for(dir.path(), SamplingMode::Graceful);
    assert!(unseeded.config().seed.is_none());
    let _ = unseeded.rng().seed();
}

#[test]
fn compose_variant_counts_infeasible_sprites() {
    let dir = tempfile::tempdir().unwrap();
    let sprites = dir.path().join("sprites");
    std::fs::create_dir_all(&sprites).unwrap();
    write_sprite(&sprites, "huge.png", 50, 5);

    let builder = CorpusBuilder::new(CorpusConfig {
        max_dimension_ratio: 4.0,
        sprites_per_variant: 1,
        ..builder_for(dir.path(), SamplingMode::Graceful).config().clone()
    })
    .unwrap();
    let catalog = SpriteCatalog::scan(&sprites).unwrap();
    let mut pool = AssetPool::empty(dir.path().join("m.txt"));
    let mut report = CorpusReport::default();

    let (_, labels) = builder
        .compose_variant(
            Canvas::filled(Size::new(10, 10), [0, 0, 0]),
            &catalog,
            &mut pool,
            &mut SeededRandom::new(1),
            &mut report,
        )
        .unwrap();
    assert!(labels.is_empty());
    assert_eq!(report.sprites_infeasible, 1);
    assert_eq!(report.sprites_unreadable, 0);
    assert!(pool.is_used("huge.png"));
}

#[test]
fn screening_skips_duplicate_stems_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let bg = dir.path();
    std::fs::write(bg.join("a.bmp"), b"broken").unwrap();
    for name in ["a.png", "a.tif", "b.png"] {
        image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]))
            .save(bg.join(name))
            .unwrap();
    }
    let paths = ["a.bmp", "a.png", "a.tif", "b.png"].map(|n| bg.join(n)).to_vec();

    let mut report = CorpusReport::default();
    let usable = screen_backgrounds(paths, &mut report);
    let names: Vec<_> = usable.iter().map(|b| (b.stem.as_str(), b.ext.as_str())).collect();
    assert_eq!(names, [("a", ".png"), ("b", ".png")]);
    assert_eq!(report.backgrounds_skipped, 2);
}
