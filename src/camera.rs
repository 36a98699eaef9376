//! Frame composition: background, entities and optional darkness, scrolled to follow a focus.

use glam::{IVec2, UVec2, Vec2};
use image::{imageops, Rgba, RgbaImage};
use tracing::{trace, warn};

use crate::context::GameContext;
use crate::entity::Entity;
use crate::map::geometry::LevelGeometry;
use crate::texture::sprite::SpriteAtlas;
use crate::texture::text::TextTexture;

/// Scroll offset along one axis.
///
/// Centers `focus` in the viewport, clamped so the view never runs past either level edge:
/// the result lies in `[viewport - level, 0]`. A level smaller than the viewport is pinned
/// at `viewport - level`.
pub fn scroll_offset(viewport: i32, level: i32, focus: i32) -> i32 {
    let centered = viewport / 2 - focus;
    // `i32::clamp` panics when the level is smaller than the viewport.
    (viewport - level).max(centered.min(0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport: UVec2,
    /// In world pixels.
    light_radius: f32,
    darken: bool,
}

impl Camera {
    pub fn new(ctx: &GameContext) -> Self {
        Self {
            viewport: ctx.viewport,
            light_radius: ctx.light_radius * ctx.zoom_f(),
            darken: ctx.darken,
        }
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Translation from world to screen pixels when following `focus`.
    pub fn offset(&self, level: UVec2, focus: IVec2) -> IVec2 {
        let viewport = self.viewport.as_ivec2();
        let level = level.as_ivec2();
        IVec2::new(
            scroll_offset(viewport.x, level.x, focus.x),
            scroll_offset(viewport.y, level.y, focus.y),
        )
    }

    /// Composes one frame following `entities[focus]`; the focus is drawn on top of the rest.
    pub fn beam(&self, level: &LevelGeometry, sprites: &SpriteAtlas, entities: &[Entity], focus: usize) -> RgbaImage {
        let focus_center = entities.get(focus).map(Entity::center).unwrap_or_default();
        let offset = self.offset(level.world_size(), focus_center);

        let mut frame = RgbaImage::from_pixel(self.viewport.x, self.viewport.y, level.biome().sky_color());
        imageops::replace(&mut frame, level.background(), offset.x as i64, offset.y as i64);

        let mut lights = Vec::new();
        let others = entities.iter().enumerate().filter(|(i, _)| *i != focus).map(|(_, e)| e);
        for entity in others.chain(entities.get(focus)) {
            let sprite = entity.sprite();
            let at = entity.position + offset;
            if let Err(e) = sprites.draw(&mut frame, sprite.col, sprite.row, sprite.mirrored, at.x as i64, at.y as i64) {
                warn!(id = entity.id, error = %e, "Entity sprite missing");
            }
            if entity.emits_light() {
                lights.push(entity.center() + offset);
            }
        }

        if self.darken {
            let overlay = self.darkness(&lights);
            imageops::overlay(&mut frame, &overlay, 0, 0);
        }
        trace!(x = offset.x, y = offset.y, lights = lights.len(), "Beamed frame");
        frame
    }

    /// An opaque black overlay with a radial hole cut around every light.
    ///
    /// Each hole keeps the overlay's alpha only where the gradient is opaque: fully
    /// transparent at the light, back to opaque at the radius.
    fn darkness(&self, lights: &[IVec2]) -> RgbaImage {
        let mut overlay = RgbaImage::from_pixel(self.viewport.x, self.viewport.y, Rgba([0, 0, 0, 255]));
        let radius = self.light_radius.max(1.0);
        let reach = radius.ceil() as i32;
        let size = self.viewport.as_ivec2();

        for light in lights {
            let min = (*light - IVec2::splat(reach)).max(IVec2::ZERO);
            let max = (*light + IVec2::splat(reach)).min(size);
            for y in min.y..max.y {
                for x in min.x..max.x {
                    let distance = Vec2::new((x - light.x) as f32, (y - light.y) as f32).length();
                    let coverage = (distance / radius).min(1.0);
                    let pixel = overlay.get_pixel_mut(x as u32, y as u32);
                    pixel[3] = (f32::from(pixel[3]) * coverage).round() as u8;
                }
            }
        }
        overlay
    }

    /// Draws `text` centered in the frame.
    pub fn show_msg(&self, frame: &mut RgbaImage, font: &SpriteAtlas, text: &str) {
        let text_texture = TextTexture::new(font);
        let extents = text_texture.extents(text).as_ivec2();
        let size = IVec2::new(frame.width() as i32, frame.height() as i32);
        text_texture.render(frame, text, (size - extents) / 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_centers_when_away_from_edges() {
        assert_eq!(scroll_offset(100, 1000, 500), -450);
    }

    #[test]
    fn test_offset_clamps_at_edges() {
        assert_eq!(scroll_offset(100, 1000, 0), 0);
        assert_eq!(scroll_offset(100, 1000, -50), 0);
        assert_eq!(scroll_offset(100, 1000, 1000), -900);
        assert_eq!(scroll_offset(100, 1000, 5000), -900);
    }

    #[test]
    fn test_small_level_does_not_panic() {
        assert_eq!(scroll_offset(100, 40, 20), 60);
    }

    #[test]
    fn test_darkness_is_clear_at_light_and_opaque_far_away() {
        let ctx = GameContext::default().with_zoom(1).with_viewport(UVec2::new(200, 100));
        let camera = Camera::new(&ctx);
        let overlay = camera.darkness(&[IVec2::new(50, 50)]);
        assert_eq!(overlay.get_pixel(50, 50)[3], 0);
        assert_eq!(overlay.get_pixel(199, 0)[3], 255);
        let halfway = overlay.get_pixel(50 + (ctx.light_radius / 2.0) as u32, 50)[3];
        assert!(halfway > 0 && halfway < 255);
    }
}
