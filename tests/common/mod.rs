#![allow(dead_code)]

use glam::UVec2;
use image::{Rgba, RgbaImage};
use tilerunner::context::GameContext;
use tilerunner::game::{Assets, Game};
use tilerunner::map::catalog::{BLOCK_ROW, DECOR_ROW};
use tilerunner::texture::sprite::{AtlasConfig, SpriteAtlas};

/// Unzoomed cell size of the test atlases.
pub const CELL: u32 = 16;
pub const ZOOM: u32 = 2;
/// Cell size in world pixels.
pub const WORLD_CELL: i32 = (CELL * ZOOM) as i32;

/// Opaque body of every entity frame, unzoomed: x 3..13, y 4..12.
pub const BODY: (u32, u32, u32, u32) = (3, 4, 10, 8);

const SOLID: Rgba<u8> = Rgba([120, 80, 40, 255]);
const BODY_COLOR: Rgba<u8> = Rgba([200, 40, 40, 255]);

fn fill(image: &mut RgbaImage, col: u32, row: u32, color: Rgba<u8>, opaque: impl Fn(u32, u32) -> bool) {
    for y in 0..CELL {
        for x in 0..CELL {
            if opaque(x, y) {
                image.put_pixel(col * CELL + x, row * CELL + y, color);
            }
        }
    }
}

/// Whether pixel `(x, y)` of a ramp cell is opaque: the lower-left triangle.
pub fn ramp(x: u32, y: u32) -> bool {
    y >= CELL - 1 - x
}

/// A tile sheet laid out like the real one: four biome rows, the block row and the decoration row.
///
/// Non-square biome tiles are ramps, hazards fill their lower half, everything else is a full cell.
pub fn tile_image() -> RgbaImage {
    let (cols, rows) = (10, DECOR_ROW + 1);
    let mut image = RgbaImage::new(cols * CELL, rows * CELL);
    for row in 0..rows {
        for col in 0..cols {
            match (col, row) {
                (2..=7, r) if r < BLOCK_ROW => fill(&mut image, col, row, SOLID, ramp),
                (5 | 6, r) if r == BLOCK_ROW => fill(&mut image, col, row, SOLID, |_, y| y >= CELL / 2),
                _ => fill(&mut image, col, row, SOLID, |_, _| true),
            }
        }
    }
    image
}

/// An entity sheet with six rows of four frames, each holding the same small body.
pub fn sprite_image() -> RgbaImage {
    let (cols, rows) = (4, 6);
    let (bx, by, bw, bh) = BODY;
    let mut image = RgbaImage::new(cols * CELL, rows * CELL);
    for row in 0..rows {
        for col in 0..cols {
            fill(&mut image, col, row, BODY_COLOR, |x, y| {
                (bx..bx + bw).contains(&x) && (by..by + bh).contains(&y)
            });
        }
    }
    image
}

pub fn tile_atlas() -> SpriteAtlas {
    SpriteAtlas::new(tile_image(), AtlasConfig::new(UVec2::splat(CELL), ZOOM)).unwrap()
}

pub fn sprite_atlas() -> SpriteAtlas {
    SpriteAtlas::new(sprite_image(), AtlasConfig::new(UVec2::splat(CELL), ZOOM)).unwrap()
}

pub fn assets() -> Assets {
    Assets {
        tiles: tile_atlas(),
        sprites: sprite_atlas(),
        font: None,
    }
}

pub fn context() -> GameContext {
    GameContext::default().with_zoom(ZOOM).with_viewport(UVec2::new(320, 240))
}

/// A session with `source` loaded.
pub fn game(source: &str) -> Game {
    let mut game = Game::new(context(), assets());
    game.load_level(source).unwrap();
    game
}

/// Runs `frames` updates of `dt` seconds.
pub fn run(game: &mut Game, frames: u32, dt: f32) {
    for _ in 0..frames {
        game.update(dt);
    }
}
