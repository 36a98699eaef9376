mod common;

use glam::UVec2;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use speculoos::prelude::*;
use tilerunner::error::TextureError;
use tilerunner::region::Rect;
use tilerunner::texture::sprite::{AtlasConfig, SpriteAtlas};
use tilerunner::texture::text::TextTexture;

use common::{sprite_atlas, sprite_image, BODY, CELL, ZOOM};

#[test]
fn test_grid_counts_whole_pitches() {
    // Pitch is cell plus gap, so 15 px hold three cells and 14 px only two.
    let atlas = SpriteAtlas::new(
        RgbaImage::new(15, 5),
        AtlasConfig::new(UVec2::splat(4), 1).with_gap(UVec2::ONE),
    )
    .unwrap();
    assert_that(&atlas.grid()).is_equal_to(UVec2::new(3, 1));

    let atlas = SpriteAtlas::new(
        RgbaImage::new(14, 5),
        AtlasConfig::new(UVec2::splat(4), 1).with_gap(UVec2::ONE),
    )
    .unwrap();
    assert_that(&atlas.grid()).is_equal_to(UVec2::new(2, 1));
}

#[test]
fn test_zoom_scales_frames() {
    let atlas = sprite_atlas();
    assert_that(&atlas.frame_size()).is_equal_to(UVec2::splat(16 * ZOOM));
    assert_that(&atlas.grid()).is_equal_to(UVec2::new(4, 6));
}

#[test]
fn test_prescaled_source_is_used_as_is() {
    let source = sprite_image();
    let (w, h) = source.dimensions();
    let scaled = imageops::resize(&source, w * ZOOM, h * ZOOM, FilterType::Nearest);

    let config = AtlasConfig::new(UVec2::splat(CELL), ZOOM);
    let prescaled = SpriteAtlas::new(scaled, config.prescaled(true)).unwrap();
    let zoomed = sprite_atlas();

    assert_that(&prescaled.grid()).is_equal_to(zoomed.grid());
    assert_that(&prescaled.frame_size()).is_equal_to(zoomed.frame_size());
    assert_that(&prescaled.tight_bounds(2, 3).unwrap()).is_equal_to(zoomed.tight_bounds(2, 3).unwrap());
}

#[test]
fn test_out_of_range_frame_is_an_error() {
    let atlas = sprite_atlas();
    assert_that(&atlas.frame(4, 0, false).map(|_| ())).is_err_containing(TextureError::FrameOutOfRange {
        col: 4,
        row: 0,
        cols: 4,
        rows: 6,
    });
    assert_that(&atlas.tight_bounds(0, 6)).is_err();
    assert_that(&atlas.frame(3, 5, true).is_ok()).is_true();
}

#[test]
fn test_tight_bounds_trim_transparency() {
    let atlas = sprite_atlas();
    let (x, y, w, h) = BODY;
    let z = ZOOM as i32;
    let expected = Rect::new(x as i32 * z, y as i32 * z, w as i32 * z, h as i32 * z);
    assert_that(&atlas.tight_bounds(1, 2).unwrap()).is_equal_to(expected);
}

#[test]
fn test_mirrored_bounds_reflect() {
    let mut source = RgbaImage::new(8, 4);
    source.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
    let atlas = SpriteAtlas::new(source, AtlasConfig::new(UVec2::splat(4), 1)).unwrap();

    assert_that(&atlas.tight_bounds(0, 0).unwrap()).is_equal_to(Rect::new(1, 1, 1, 1));
    assert_that(&atlas.tight_bounds_mirrored(0, 0).unwrap()).is_equal_to(Rect::new(2, 1, 1, 1));

    let mirrored = atlas.frame(0, 0, true).unwrap().to_image();
    assert_that(&mirrored.get_pixel(2, 1).0[3]).is_equal_to(255);
    assert_that(&mirrored.get_pixel(1, 1).0[3]).is_equal_to(0);
}

#[test]
fn test_empty_frame_has_empty_bounds() {
    let atlas = SpriteAtlas::new(RgbaImage::new(4, 4), AtlasConfig::new(UVec2::splat(4), 1)).unwrap();
    assert_that(&atlas.tight_bounds(0, 0).unwrap().is_empty()).is_true();
}

#[test]
fn test_invalid_configs() {
    let zero_cell = SpriteAtlas::new(RgbaImage::new(4, 4), AtlasConfig::new(UVec2::ZERO, 1));
    assert_that(&matches!(zero_cell, Err(TextureError::InvalidConfig(_)))).is_true();

    let too_small = SpriteAtlas::new(RgbaImage::new(3, 3), AtlasConfig::new(UVec2::splat(4), 1));
    assert_that(&matches!(too_small, Err(TextureError::InvalidConfig(_)))).is_true();
}

#[test]
fn test_decode_rejects_garbage() {
    let result = SpriteAtlas::decode(b"not a png", AtlasConfig::new(UVec2::splat(4), 1));
    assert_that(&result.is_err()).is_true();
}

#[test]
fn test_text_extents_and_centering() {
    let font = SpriteAtlas::new(RgbaImage::new(16 * 4, 6 * 4), AtlasConfig::new(UVec2::splat(4), 1)).unwrap();
    let text = TextTexture::new(&font);
    assert_that(&text.extents("GAME OVER")).is_equal_to(UVec2::new(9 * 4, 4));
    assert_that(&text.text_width("")).is_equal_to(0);
}
