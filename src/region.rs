//! Rectangles, pixel silhouettes and the unioned regions used for collision tests.

use std::collections::HashMap;
use std::sync::Arc;

use glam::IVec2;
use image::RgbaImage;
use smallvec::SmallVec;

/// An axis-aligned integer rectangle in world pixels.
///
/// Rectangles are half-open: a rectangle at `x` with width `w` covers `x..x + w`,
/// so two rectangles that merely touch do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.w as u64 * self.h as u64
        }
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns the overlapping area of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect::new(x, y, self.right().min(other.right()) - x, self.bottom().min(other.bottom()) - y))
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// A pixel-exact silhouette: one bit per source pixel, set where the pixel is not fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
    filled: usize,
}

impl Mask {
    /// Samples every pixel of `image` once.
    pub fn from_alpha(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let bits: Vec<bool> = image.pixels().map(|p| p.0[3] != 0).collect();
        let filled = bits.iter().filter(|&&b| b).count();
        Self {
            width,
            height,
            bits,
            filled,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of set cells, i.e. non-transparent source pixels.
    pub fn cell_count(&self) -> usize {
        self.filled
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }
}

/// One unioned area of a [`Region`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    /// A shared silhouette placed at a world offset.
    Mask { origin: IVec2, mask: Arc<Mask> },
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(rect) => *rect,
            Shape::Mask { origin, mask } => Rect::new(origin.x, origin.y, mask.width() as i32, mask.height() as i32),
        }
    }

    pub fn intersects(&self, rect: &Rect) -> bool {
        match self {
            Shape::Rect(own) => own.intersects(rect),
            Shape::Mask { origin, mask } => {
                let Some(overlap) = self.bounds().intersection(rect) else {
                    return false;
                };
                (overlap.y..overlap.bottom()).any(|y| {
                    (overlap.x..overlap.right()).any(|x| mask.is_set((x - origin.x) as u32, (y - origin.y) as u32))
                })
            }
        }
    }

    /// Number of unit cells this shape covers.
    pub fn cell_count(&self) -> u64 {
        match self {
            Shape::Rect(rect) => rect.area(),
            Shape::Mask { mask, .. } => mask.cell_count() as u64,
        }
    }
}

/// Stable handle to a shape inside a [`Region`].
pub type PieceId = usize;

/// A union of shapes, bucketed on a fixed grid so intersection tests only visit nearby pieces.
///
/// Pieces are never moved once added; removal leaves a hole so that every [`PieceId`] stays valid.
#[derive(Debug, Clone)]
pub struct Region {
    bucket_size: i32,
    pieces: Vec<Option<Shape>>,
    buckets: HashMap<IVec2, SmallVec<[PieceId; 2]>>,
}

impl Region {
    pub fn new(bucket_size: u32) -> Self {
        Self {
            bucket_size: bucket_size.max(1) as i32,
            pieces: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    pub fn add_rect(&mut self, rect: Rect) -> PieceId {
        self.add(Shape::Rect(rect))
    }

    pub fn add_mask(&mut self, origin: IVec2, mask: Arc<Mask>) -> PieceId {
        self.add(Shape::Mask { origin, mask })
    }

    pub fn add(&mut self, shape: Shape) -> PieceId {
        let id = self.pieces.len();
        for key in self.bucket_keys(&shape.bounds()) {
            self.buckets.entry(key).or_default().push(id);
        }
        self.pieces.push(Some(shape));
        id
    }

    /// Removes a piece, returning it if it was still present.
    pub fn remove(&mut self, id: PieceId) -> Option<Shape> {
        let shape = self.pieces.get_mut(id)?.take()?;
        for key in self.bucket_keys(&shape.bounds()) {
            if let Some(ids) = self.buckets.get_mut(&key) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.buckets.remove(&key);
                }
            }
        }
        Some(shape)
    }

    pub fn get(&self, id: PieceId) -> Option<&Shape> {
        self.pieces.get(id).and_then(Option::as_ref)
    }

    /// Number of live pieces.
    pub fn len(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shapes(&self) -> impl Iterator<Item = (PieceId, &Shape)> {
        self.pieces.iter().enumerate().filter_map(|(id, p)| p.as_ref().map(|s| (id, s)))
    }

    /// Total number of unit cells covered, counting overlaps once per piece.
    pub fn cell_count(&self) -> u64 {
        self.shapes().map(|(_, s)| s.cell_count()).sum()
    }

    pub fn intersects(&self, rect: &Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        self.bucket_keys(rect).any(|key| {
            self.buckets
                .get(&key)
                .is_some_and(|ids| ids.iter().any(|&id| self.get(id).is_some_and(|s| s.intersects(rect))))
        })
    }

    /// Ids of every live piece intersecting `rect`, in ascending order.
    pub fn intersecting(&self, rect: &Rect) -> SmallVec<[PieceId; 4]> {
        let mut found: SmallVec<[PieceId; 4]> = SmallVec::new();
        if rect.is_empty() {
            return found;
        }
        for key in self.bucket_keys(rect) {
            let Some(ids) = self.buckets.get(&key) else { continue };
            for &id in ids {
                if !found.contains(&id) && self.get(id).is_some_and(|s| s.intersects(rect)) {
                    found.push(id);
                }
            }
        }
        found.sort_unstable();
        found
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        self.intersects(&Rect::new(point.x, point.y, 1, 1))
    }

    fn bucket_keys(&self, rect: &Rect) -> impl Iterator<Item = IVec2> {
        let size = self.bucket_size;
        let (x0, y0) = (rect.x.div_euclid(size), rect.y.div_euclid(size));
        let (x1, y1) = ((rect.right() - 1).div_euclid(size), (rect.bottom() - 1).div_euclid(size));
        let empty = rect.is_empty();
        (y0..=y1)
            .flat_map(move |y| (x0..=x1).map(move |x| IVec2::new(x, y)))
            .filter(move |_| !empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn diagonal_mask() -> Arc<Mask> {
        let mut image = RgbaImage::new(4, 4);
        for i in 0..4 {
            image.put_pixel(i, i, Rgba([255, 255, 255, 255]));
        }
        Arc::new(Mask::from_alpha(&image))
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
        assert!(a.intersects(&Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn test_mask_intersection_is_pixel_exact() {
        let shape = Shape::Mask {
            origin: IVec2::new(100, 100),
            mask: diagonal_mask(),
        };
        assert!(shape.intersects(&Rect::new(101, 101, 1, 1)));
        assert!(!shape.intersects(&Rect::new(102, 100, 2, 1)));
        assert_eq!(shape.cell_count(), 4);
    }

    #[test]
    fn test_remove_keeps_other_ids_valid() {
        let mut region = Region::new(16);
        let a = region.add_rect(Rect::new(0, 0, 16, 16));
        let b = region.add_rect(Rect::new(16, 0, 16, 16));
        assert!(region.remove(a).is_some());
        assert!(region.remove(a).is_none());
        assert!(!region.intersects(&Rect::new(0, 0, 8, 8)));
        assert_eq!(region.get(b), Some(&Shape::Rect(Rect::new(16, 0, 16, 16))));
        assert_eq!(region.len(), 1);
    }

    #[test]
    fn test_negative_coordinates_bucket_correctly() {
        let mut region = Region::new(16);
        region.add_rect(Rect::new(-20, -20, 8, 8));
        assert!(region.intersects(&Rect::new(-15, -15, 2, 2)));
        assert!(!region.intersects(&Rect::new(-4, -4, 2, 2)));
    }
}
