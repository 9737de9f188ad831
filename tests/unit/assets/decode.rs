use std::io::Cursor;

use super::*;

fn encode_png(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn rgb_sprite_gets_opaque_alpha() {
    let rgb = image::RgbImage::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
    let sprite = decode_sprite(&encode_png(DynamicImage::ImageRgb8(rgb))).unwrap();
    assert_eq!(sprite.size(), Size::new(2, 1));
    assert_eq!(
        sprite.rgba().as_raw().as_slice(),
        &[10, 20, 30, 255, 40, 50, 60, 255]
    );
}

#[test]
fn rgba_sprite_keeps_alpha() {
    let rgba = RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let sprite = decode_sprite(&encode_png(DynamicImage::ImageRgba8(rgba))).unwrap();
    assert_eq!(sprite.rgba().as_raw().as_slice(), &[100, 50, 200, 128]);
}

#[test]
fn corrupt_and_missing_sprites_are_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, b"definitely not a png").unwrap();

    let err = load_sprite(&bad).unwrap_err();
    assert!(matches!(err, SynthError::SpriteUnreadable { .. }));
    assert!(err.is_sprite_local());

    let missing = dir.path().join("missing.png");
    assert!(matches!(
        load_sprite(&missing).unwrap_err(),
        SynthError::SpriteUnreadable { .. }
    ));
}

#[test]
fn background_alpha_is_discarded() {
    let rgba = RgbaImage::from_raw(1, 1, vec![1, 2, 3, 0]).unwrap();
    let canvas = decode_background(&encode_png(DynamicImage::ImageRgba8(rgba))).unwrap();
    assert_eq!(canvas.rgba().as_raw().as_slice(), &[1, 2, 3, 255]);
}

#[test]
fn corrupt_background_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bg.jpg");
    std::fs::write(&bad, b"\xff\xd8 truncated").unwrap();
    assert!(matches!(
        load_background(&bad).unwrap_err(),
        SynthError::BackgroundUnreadable { .. }
    ));
}

#[test]
fn scaled_to_derives_new_raster() {
    let src = Sprite::from_rgba(RgbaImage::from_pixel(8, 4, image::Rgba([9, 9, 9, 255])));
    let small = src.scaled_to(Size::new(4, 2));
    assert_eq!(small.size(), Size::new(4, 2));
    assert_eq!(src.size(), Size::new(8, 4));
    assert!(
        small
            .rgba()
            .pixels()
            .all(|p| p.0[0].abs_diff(9) <= 1 && p.0[3] >= 254)
    );

    let big = src.scaled_to(Size::new(16, 8));
    assert_eq!(big.size(), Size::new(16, 8));
}

#[test]
fn decode_failures_name_the_step() {
    let err = decode_sprite(b"junk").unwrap_err();
    assert!(format!("{err:#}").starts_with("decode image from memory"));

    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bg.png");
    std::fs::write(&bad, b"junk").unwrap();
    match load_background(&bad).unwrap_err() {
        SynthError::BackgroundUnreadable { reason, .. } => {
            assert!(reason.contains("decode image from memory"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
