//! Static level geometry: the tile grid, its collision regions and the pre-rendered background.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{IVec2, UVec2};
use image::RgbaImage;
use tracing::{debug, warn};

use crate::entity::attribute::AttributeSet;
use crate::error::TextureError;
use crate::map::biome::Biome;
use crate::map::catalog::{GeometryClass, TileDescriptor, SPENT_BOX_FRAME};
use crate::map::parser::{LevelGrid, ParsedLevel, SpawnPoint};
use crate::region::{Mask, PieceId, Rect, Region};
use crate::texture::sprite::SpriteAtlas;

/// A not-yet-triggered item box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemBox {
    pub cell: UVec2,
    pub attributes: AttributeSet,
}

/// The geometry of a loaded level.
///
/// Regions are built once here and are read-only afterwards, except that an item box
/// is removed from the item-box region when it triggers.
pub struct LevelGeometry {
    biome: Biome,
    grid: LevelGrid,
    tile_size: UVec2,
    solid: Region,
    climbable: Region,
    hazard: Region,
    item_boxes: Region,
    boxes: HashMap<PieceId, ItemBox>,
    background: RgbaImage,
    spawns: Vec<SpawnPoint>,
}

impl LevelGeometry {
    /// Builds every region and renders the static background.
    ///
    /// Tiles whose sprite is outside the atlas are drawn as nothing; a non-square tile
    /// without a sprite also contributes no collision.
    pub fn build(level: ParsedLevel, tiles: &SpriteAtlas) -> Self {
        let ParsedLevel { biome, grid, spawns } = level;
        let tile_size = tiles.frame_size();
        let world = grid.size() * tile_size;
        let bucket = tile_size.x.max(tile_size.y);

        let mut geometry = Self {
            biome,
            grid,
            tile_size,
            solid: Region::new(bucket),
            climbable: Region::new(bucket),
            hazard: Region::new(bucket),
            item_boxes: Region::new(bucket),
            boxes: HashMap::new(),
            background: RgbaImage::from_pixel(world.x, world.y, biome.sky_color()),
            spawns,
        };

        // One silhouette per tile type, shared by every occurrence.
        let mut silhouettes: HashMap<char, Option<Arc<Mask>>> = HashMap::new();
        let cells: Vec<(UVec2, &'static TileDescriptor)> = geometry.grid.iter().collect();

        for (cell, descriptor) in cells {
            let origin = geometry.cell_origin(cell);
            let rect = geometry.cell_rect(cell);

            match descriptor.class {
                GeometryClass::Air | GeometryClass::Passable => {}
                GeometryClass::SolidSquare => {
                    geometry.solid.add_rect(rect);
                }
                GeometryClass::SolidNonSquare | GeometryClass::Hazard => {
                    let mask = silhouettes
                        .entry(descriptor.symbol)
                        .or_insert_with(|| sample_silhouette(descriptor, biome, tiles))
                        .clone();
                    if let Some(mask) = mask {
                        match descriptor.class {
                            GeometryClass::Hazard => geometry.hazard.add_mask(origin, mask),
                            _ => geometry.solid.add_mask(origin, mask),
                        };
                    }
                }
                GeometryClass::ItemBox => {
                    geometry.solid.add_rect(rect);
                    let id = geometry.item_boxes.add_rect(rect);
                    geometry.boxes.insert(
                        id,
                        ItemBox {
                            cell,
                            attributes: descriptor.attributes,
                        },
                    );
                }
                GeometryClass::Climbable => {
                    geometry.climbable.add_rect(rect);
                }
            }

            if let Some(frame) = descriptor.frame {
                let (col, row) = frame.resolve(biome);
                if let Err(e) = tiles.draw(&mut geometry.background, col, row, false, origin.x as i64, origin.y as i64) {
                    warn!(symbol = ?descriptor.symbol, col = cell.x, row = cell.y, error = %e, "Tile sprite missing, drawing nothing");
                }
            }
        }

        debug!(
            solid = geometry.solid.len(),
            climbable = geometry.climbable.len(),
            hazard = geometry.hazard.len(),
            item_boxes = geometry.item_boxes.len(),
            silhouettes = silhouettes.len(),
            "Built level geometry"
        );
        geometry
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn grid(&self) -> &LevelGrid {
        &self.grid
    }

    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    pub fn tile_size(&self) -> UVec2 {
        self.tile_size
    }

    /// Size of the level in world pixels.
    pub fn world_size(&self) -> UVec2 {
        self.grid.size() * self.tile_size
    }

    pub fn cell_origin(&self, cell: UVec2) -> IVec2 {
        (cell * self.tile_size).as_ivec2()
    }

    pub fn cell_rect(&self, cell: UVec2) -> Rect {
        let origin = self.cell_origin(cell);
        Rect::new(origin.x, origin.y, self.tile_size.x as i32, self.tile_size.y as i32)
    }

    pub fn solid(&self) -> &Region {
        &self.solid
    }

    pub fn climbable(&self) -> &Region {
        &self.climbable
    }

    pub fn hazard(&self) -> &Region {
        &self.hazard
    }

    pub fn item_boxes(&self) -> &Region {
        &self.item_boxes
    }

    pub fn background(&self) -> &RgbaImage {
        &self.background
    }

    /// Triggers the first untriggered item box touching `probe`.
    ///
    /// The box is removed from the item-box region (it stays solid) and its cell is
    /// repainted with the spent-box sprite.
    pub fn trigger_item_box(&mut self, probe: &Rect, tiles: &SpriteAtlas) -> Option<ItemBox> {
        let id = *self.item_boxes.intersecting(probe).first()?;
        self.item_boxes.remove(id);
        let item_box = self.boxes.remove(&id)?;

        let origin = self.cell_origin(item_box.cell);
        let sky = self.biome.sky_color();
        for y in 0..self.tile_size.y {
            for x in 0..self.tile_size.x {
                if let Some(pixel) = self.background.get_pixel_mut_checked(origin.x as u32 + x, origin.y as u32 + y) {
                    *pixel = sky;
                }
            }
        }
        let (col, row) = SPENT_BOX_FRAME.resolve(self.biome);
        if let Err(e) = tiles.draw(&mut self.background, col, row, false, origin.x as i64, origin.y as i64) {
            warn!(error = %e, "Spent box sprite missing");
        }

        debug!(col = item_box.cell.x, row = item_box.cell.y, attributes = ?item_box.attributes, "Item box triggered");
        Some(item_box)
    }
}

fn sample_silhouette(descriptor: &TileDescriptor, biome: Biome, tiles: &SpriteAtlas) -> Option<Arc<Mask>> {
    let result: Result<Arc<Mask>, TextureError> = descriptor
        .frame
        .ok_or_else(|| TextureError::InvalidConfig(format!("tile {:?} has no sprite", descriptor.symbol)))
        .and_then(|frame| {
            let (col, row) = frame.resolve(biome);
            tiles.frame(col, row, false)
        })
        .map(|view| Arc::new(Mask::from_alpha(&view.to_image())));

    match result {
        Ok(mask) => Some(mask),
        Err(e) => {
            warn!(symbol = ?descriptor.symbol, error = %e, "No silhouette for tile, it will not collide");
            None
        }
    }
}
