use super::*;
use crate::foundation::rng::SeededRandom;

fn catalog(names: &[&str]) -> SpriteCatalog {
    SpriteCatalog::from_names("sprites", names.iter().map(|s| s.to_string()).collect())
}

#[test]
fn missing_manifest_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let pool = AssetPool::load(dir.path().join("used_assets.txt")).unwrap();
    assert_eq!(pool.used_count(), 0);
}

#[test]
fn load_skips_blank_lines_and_strips_paths() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("used_assets.txt");
    std::fs::write(&manifest, "b.png\n\n  \n/old/run/a.png\nb.png\n").unwrap();

    let pool = AssetPool::load(&manifest).unwrap();
    assert_eq!(pool.used().collect::<Vec<_>>(), vec!["a.png", "b.png"]);
}

#[test]
fn sample_excludes_used_sprites() {
    let mut pool = AssetPool::empty("m.txt");
    pool.mark_used(["a.png", "b.png"]);
    let mut rng = SeededRandom::new(1);

    let out = pool
        .sample(
            &catalog(&["a.png", "b.png", "c.png", "d.png"]),
            2,
            SamplingMode::Graceful,
            &mut rng,
        )
        .unwrap();
    let mut picked = out.picked.clone();
    picked.sort();
    assert_eq!(picked, vec!["c.png", "d.png"]);
    assert_eq!(out.shortfall, 0);
}

#[test]
fn graceful_shortfall_returns_what_is_left() {
    let pool = AssetPool::empty("m.txt");
    let mut rng = SeededRandom::new(5);
    let out = pool
        .sample(&catalog(&["a.png", "b.png"]), 3, SamplingMode::Graceful, &mut rng)
        .unwrap();
    assert_eq!(out.picked.len(), 2);
    assert_eq!(out.shortfall, 1);
}

#[test]
fn strict_shortfall_is_an_error() {
    let pool = AssetPool::empty("m.txt");
    let mut rng = SeededRandom::new(5);
    let err = pool
        .sample(&catalog(&["a.png", "b.png"]), 3, SamplingMode::Strict, &mut rng)
        .unwrap_err();
    assert!(matches!(
        err,
        SynthError::InsufficientAssets {
            requested: 3,
            available: 2
        }
    ));

    let ok = pool
        .sample(&catalog(&["a.png", "b.png"]), 2, SamplingMode::Strict, &mut rng)
        .unwrap();
    assert_eq!(ok.picked.len(), 2);
}

#[test]
fn sampling_is_reproducible_under_a_seed() {
    let pool = AssetPool::empty("m.txt");
    let cat = catalog(&["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"]);
    let a = pool
        .sample(&cat, 3, SamplingMode::Graceful, &mut SeededRandom::new(11))
        .unwrap();
    let b = pool
        .sample(&cat, 3, SamplingMode::Graceful, &mut SeededRandom::new(11))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn persist_round_trip_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("used_assets.txt");
    std::fs::write(&manifest, "z.png\na.png\nm.png\n").unwrap();

    let pool = AssetPool::load(&manifest).unwrap();
    let mut rng = SeededRandom::new(0);
    let out = pool
        .sample(&catalog(&["a.png", "q.png"]), 0, SamplingMode::Strict, &mut rng)
        .unwrap();
    assert!(out.picked.is_empty());
    pool.persist().unwrap();
    let first = std::fs::read(&manifest).unwrap();

    AssetPool::load(&manifest).unwrap().persist().unwrap();
    let second = std::fs::read(&manifest).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, b"a.png\nm.png\nz.png\n");
}

#[test]
fn persist_deduplicates_union() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("nested").join("used_assets.txt");
    let mut pool = AssetPool::empty(&manifest);
    pool.mark_used(["b.png", "a.png"]);
    pool.mark_used(vec!["a.png".to_string()]);
    pool.persist().unwrap();
    assert_eq!(std::fs::read_to_string(&manifest).unwrap(), "a.png\nb.png\n");
}
