//! This module provides text rendering from a glyph atlas.
//!
//! The glyph atlas is an ordinary [`SpriteAtlas`] holding printable ASCII in code-point
//! order, starting at the space character and wrapping every [`GLYPHS_PER_ROW`] glyphs.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use tilerunner::texture::text::TextTexture;
//!
//! let text = TextTexture::new(&font_atlas);
//! let width = text.text_width("GAME OVER");
//! text.render(&mut frame, "GAME OVER", glam::IVec2::new(10, 10));
//! ```
//!
//! Lowercase letters fall back to their uppercase glyph when the atlas does not
//! reach that far. Characters outside the atlas are skipped but still advance the cursor,
//! so measured widths always match rendered widths.

use glam::{IVec2, UVec2};
use image::RgbaImage;
use tracing::trace;

use crate::texture::sprite::SpriteAtlas;

pub const GLYPHS_PER_ROW: u32 = 16;
const FIRST_GLYPH: u32 = ' ' as u32;

/// Renders strings with a borrowed glyph atlas.
pub struct TextTexture<'a> {
    atlas: &'a SpriteAtlas,
}

impl<'a> TextTexture<'a> {
    pub fn new(atlas: &'a SpriteAtlas) -> Self {
        Self { atlas }
    }

    fn glyph(&self, c: char) -> Option<(u32, u32)> {
        let locate = |c: char| {
            let index = (c as u32).checked_sub(FIRST_GLYPH)?;
            let (col, row) = (index % GLYPHS_PER_ROW, index / GLYPHS_PER_ROW);
            self.atlas.contains(col, row).then_some((col, row))
        };
        if !c.is_ascii() || c.is_ascii_control() {
            return None;
        }
        locate(c).or_else(|| locate(c.to_ascii_uppercase()))
    }

    /// Width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.atlas.frame_size().x
    }

    /// Height of a line of text in pixels.
    pub fn text_height(&self) -> u32 {
        self.atlas.frame_size().y
    }

    /// Measured extents of `text`.
    pub fn extents(&self, text: &str) -> UVec2 {
        UVec2::new(self.text_width(text), self.text_height())
    }

    /// Draws `text` with its top-left corner at `position`.
    pub fn render(&self, target: &mut RgbaImage, text: &str, position: IVec2) {
        let advance = self.atlas.frame_size().x as i64;
        let mut x = position.x as i64;
        for c in text.chars() {
            if c != ' ' {
                if let Some((col, row)) = self.glyph(c) {
                    if let Err(e) = self.atlas.draw(target, col, row, false, x, position.y as i64) {
                        trace!(glyph = %c, error = %e, "Glyph not drawn");
                    }
                }
            }
            x += advance;
        }
    }
}
