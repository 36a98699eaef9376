use glam::UVec2;
use image::imageops::{self, FilterType};
use image::{GenericImageView, RgbaImage, SubImage};
use tracing::debug;

use crate::error::{AssetError, TextureError};
use crate::region::Rect;

/// Layout of a fixed-pitch sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Size of one cell, in unzoomed source pixels.
    pub cell: UVec2,
    /// Gap after each cell, in unzoomed source pixels.
    pub gap: UVec2,
    pub zoom: u32,
    /// Whether the source image has already been scaled by `zoom`.
    pub prescaled: bool,
}

impl AtlasConfig {
    pub fn new(cell: UVec2, zoom: u32) -> Self {
        Self {
            cell,
            gap: UVec2::ZERO,
            zoom,
            prescaled: false,
        }
    }

    pub fn with_gap(mut self, gap: UVec2) -> Self {
        self.gap = gap;
        self
    }

    pub fn prescaled(mut self, prescaled: bool) -> Self {
        self.prescaled = prescaled;
        self
    }
}

/// A sprite sheet sliced into equally sized frames.
///
/// Everything is computed once at construction: the zoomed sheet, a horizontally
/// mirrored copy of the whole sheet (so drawing a mirrored frame costs nothing extra),
/// and the alpha-trimmed bounds of every frame. The atlas is immutable afterwards.
pub struct SpriteAtlas {
    sheet: RgbaImage,
    mirrored: RgbaImage,
    frame_size: UVec2,
    pitch: UVec2,
    grid: UVec2,
    tight_bounds: Vec<Rect>,
}

impl SpriteAtlas {
    pub fn new(source: RgbaImage, config: AtlasConfig) -> Result<Self, TextureError> {
        if config.cell.x == 0 || config.cell.y == 0 {
            return Err(TextureError::InvalidConfig("cell size must be non-zero".to_string()));
        }
        if config.zoom == 0 {
            return Err(TextureError::InvalidConfig("zoom must be non-zero".to_string()));
        }

        let sheet = if config.prescaled || config.zoom == 1 {
            source
        } else {
            let (w, h) = source.dimensions();
            imageops::resize(&source, w * config.zoom, h * config.zoom, FilterType::Nearest)
        };

        let frame_size = config.cell * config.zoom;
        let pitch = (config.cell + config.gap) * config.zoom;
        let grid = UVec2::new(sheet.width() / pitch.x, sheet.height() / pitch.y);
        if grid.x == 0 || grid.y == 0 {
            return Err(TextureError::InvalidConfig(format!(
                "{}x{} sheet holds no {}x{} cells",
                sheet.width(),
                sheet.height(),
                frame_size.x,
                frame_size.y
            )));
        }

        let mirrored = imageops::flip_horizontal(&sheet);
        let mut atlas = Self {
            sheet,
            mirrored,
            frame_size,
            pitch,
            grid,
            tight_bounds: Vec::with_capacity((grid.x * grid.y) as usize),
        };
        for row in 0..grid.y {
            for col in 0..grid.x {
                let bounds = atlas.compute_tight_bounds(col, row);
                atlas.tight_bounds.push(bounds);
            }
        }

        debug!(cols = grid.x, rows = grid.y, frame_w = frame_size.x, frame_h = frame_size.y, "Created sprite atlas");
        Ok(atlas)
    }

    /// Decodes an encoded image (PNG) and slices it.
    pub fn decode(bytes: &[u8], config: AtlasConfig) -> Result<Self, crate::error::GameError> {
        let image = image::load_from_memory(bytes).map_err(AssetError::from)?.to_rgba8();
        Ok(Self::new(image, config)?)
    }

    /// Number of columns and rows in the grid.
    pub fn grid(&self) -> UVec2 {
        self.grid
    }

    /// Size of a single frame in world pixels.
    pub fn frame_size(&self) -> UVec2 {
        self.frame_size
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col < self.grid.x && row < self.grid.y
    }

    /// Returns the frame at `(col, row)`, served from the mirrored sheet when `mirrored` is set.
    pub fn frame(&self, col: u32, row: u32, mirrored: bool) -> Result<SubImage<&RgbaImage>, TextureError> {
        self.check(col, row)?;
        let y = row * self.pitch.y;
        if mirrored {
            let x = self.mirrored.width() - col * self.pitch.x - self.frame_size.x;
            Ok(self.mirrored.view(x, y, self.frame_size.x, self.frame_size.y))
        } else {
            Ok(self.sheet.view(col * self.pitch.x, y, self.frame_size.x, self.frame_size.y))
        }
    }

    /// Alpha-trimmed bounds of a frame, relative to the frame's top-left corner.
    ///
    /// A fully transparent frame has empty bounds.
    pub fn tight_bounds(&self, col: u32, row: u32) -> Result<Rect, TextureError> {
        self.check(col, row)?;
        Ok(self.tight_bounds[(row * self.grid.x + col) as usize])
    }

    /// Bounds of the mirrored frame, reflected from the precomputed ones.
    pub fn tight_bounds_mirrored(&self, col: u32, row: u32) -> Result<Rect, TextureError> {
        let bounds = self.tight_bounds(col, row)?;
        Ok(Rect::new(self.frame_size.x as i32 - bounds.right(), bounds.y, bounds.w, bounds.h))
    }

    /// Draws a frame onto `target` with alpha blending, clipping at the target's edges.
    pub fn draw(&self, target: &mut RgbaImage, col: u32, row: u32, mirrored: bool, x: i64, y: i64) -> Result<(), TextureError> {
        let frame = self.frame(col, row, mirrored)?;
        imageops::overlay(target, &*frame, x, y);
        Ok(())
    }

    fn check(&self, col: u32, row: u32) -> Result<(), TextureError> {
        if self.contains(col, row) {
            Ok(())
        } else {
            Err(TextureError::FrameOutOfRange {
                col,
                row,
                cols: self.grid.x,
                rows: self.grid.y,
            })
        }
    }

    fn compute_tight_bounds(&self, col: u32, row: u32) -> Rect {
        let (ox, oy) = (col * self.pitch.x, row * self.pitch.y);
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0, 0);
        for y in 0..self.frame_size.y {
            for x in 0..self.frame_size.x {
                if self.sheet.get_pixel(ox + x, oy + y).0[3] != 0 {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }
        if min_x == u32::MAX {
            return Rect::default();
        }
        Rect::new(min_x as i32, min_y as i32, (max_x - min_x + 1) as i32, (max_y - min_y + 1) as i32)
    }
}
