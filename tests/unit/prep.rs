use super::*;

#[test]
fn only_near_white_pixels_are_keyed() {
    let mut img = RgbaImage::from_raw(
        3,
        1,
        vec![
            250, 245, 255, 255, //
            250, 239, 255, 255, //
            10, 120, 30, 200,
        ],
    )
    .unwrap();
    assert_eq!(key_out_light_pixels(&mut img, DEFAULT_KEY_THRESHOLD), 1);
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(1, 0).0[3], 255);
    assert_eq!(img.get_pixel(2, 0).0, [10, 120, 30, 200]);
}

#[test]
fn strip_writes_keyed_pngs_and_skips_corrupt_ones() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    RgbImage::from_pixel(2, 2, image::Rgb([255, 255, 255]))
        .save(input.join("tree.png"))
        .unwrap();
    std::fs::write(input.join("junk.png"), b"nope").unwrap();

    let summary = strip_light_background(&input, &output, DEFAULT_KEY_THRESHOLD).unwrap();
    assert_eq!(summary, PrepSummary { processed: 1, skipped: 1 });

    let keyed = image::open(output.join("tree.png")).unwrap().to_rgba8();
    assert!(keyed.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn resize_to_square_keeps_names() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir_all(&input).unwrap();

    RgbImage::from_pixel(30, 10, image::Rgb([1, 2, 3]))
        .save(input.join("wide.png"))
        .unwrap();
    RgbImage::from_pixel(5, 40, image::Rgb([1, 2, 3]))
        .save(input.join("tall.bmp"))
        .unwrap();

    let summary = resize_to_square(&input, &output, 16).unwrap();
    assert_eq!(summary.processed, 2);
    for name in ["wide.png", "tall.bmp"] {
        let img = image::open(output.join(name)).unwrap();
        assert_eq!((img.width(), img.height()), (16, 16));
    }
}

#[test]
fn zero_side_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    assert!(resize_to_square(dir.path(), dir.path(), 0).is_err());
}
