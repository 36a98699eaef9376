//! The bounded move: unit-stepping collision resolution against a region.

use glam::IVec2;

use crate::entity::Entity;
use crate::region::{Rect, Region};

/// What happened during a bounded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Displacement actually applied.
    pub moved: IVec2,
    pub blocked_x: bool,
    /// Blocked while moving up, e.g. by a ceiling.
    pub blocked_up: bool,
    /// Blocked while moving down, i.e. landed.
    pub landed: bool,
    /// The iteration cap was hit before the move completed.
    pub capped: bool,
}

/// Bounds the world imposes on a move: the solid region and the level width.
#[derive(Clone, Copy)]
pub struct MoveBounds<'a> {
    pub solid: &'a Region,
    pub world_width: i32,
    pub iteration_cap: u32,
}

impl MoveBounds<'_> {
    fn blocks_x(&self, rect: &Rect) -> bool {
        rect.x < 0 || rect.right() > self.world_width || self.solid.intersects(rect)
    }
}

impl Entity {
    /// Moves by at most `(dx, dy)`, one pixel per axis per step, stopping each axis at
    /// the first step that would intersect the solid region.
    ///
    /// Crossing the left or right world edge counts as a collision. Every horizontal
    /// collision flips the facing flag. A downward collision grounds the entity: jump
    /// credits are restored and vertical velocity is zeroed. The top edge of the world
    /// is not a boundary.
    pub fn bounded_move(&mut self, dx: i32, dy: i32, bounds: MoveBounds<'_>) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        if dx == 0 && dy == 0 {
            return outcome;
        }

        let (step_x, step_y) = (dx.signum(), dy.signum());
        let (steps_x, steps_y) = (dx.unsigned_abs(), dy.unsigned_abs());
        let mut x_limited = dx == 0;
        let mut y_limited = dy == 0;
        let mut step = 0u32;

        loop {
            if step >= bounds.iteration_cap {
                outcome.capped = true;
                break;
            }

            if !x_limited && step < steps_x {
                let moved = self.bounds().translated(step_x, 0);
                if bounds.blocks_x(&moved) {
                    x_limited = true;
                    outcome.blocked_x = true;
                    self.facing_left = !self.facing_left;
                } else {
                    self.position.x += step_x;
                    outcome.moved.x += step_x;
                }
            }

            if !y_limited && step < steps_y {
                let moved = self.bounds().translated(0, step_y);
                if bounds.solid.intersects(&moved) {
                    y_limited = true;
                    if step_y > 0 {
                        outcome.landed = true;
                        self.jump_count = 0;
                        self.velocity.y = 0.0;
                    } else {
                        outcome.blocked_up = true;
                    }
                } else {
                    self.position.y += step_y;
                    outcome.moved.y += step_y;
                }
            }

            step += 1;
            if (x_limited && y_limited) || (step >= steps_x && step >= steps_y) {
                break;
            }
        }

        outcome
    }
}
