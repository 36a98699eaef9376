//! Simulated entities: one record of shared state plus a tagged [`Variant`].

pub mod attribute;
pub mod movement;
pub mod physics;
pub mod variant;

use glam::{IVec2, Vec2};
use tracing::{debug, trace};

use crate::context::{GameContext, Physics};
use crate::entity::attribute::{Attribute, AttributeSet, Counters};
use crate::entity::movement::{MoveBounds, MoveOutcome};
use crate::entity::physics::{integrate_axis, quantize};
use crate::entity::variant::{PopArc, Variant};
use crate::input::FrameInput;
use crate::map::catalog::SpawnKind;
use crate::map::geometry::LevelGeometry;
use crate::region::Rect;
use crate::texture::sprite::SpriteAtlas;

/// Unique identifier for an entity within a session.
pub type EntityId = u32;

/// A frame reference into the entity atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRef {
    pub col: u32,
    pub row: u32,
    pub mirrored: bool,
}

/// What a single update did, for the session to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub outcome: MoveOutcome,
    pub jumped: bool,
    pub died: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Top-left corner of the sprite frame, in world pixels.
    pub position: IVec2,
    /// Unzoomed pixels per second.
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub min_speed: Vec2,
    pub max_speed: Vec2,
    pub jump_count: u32,
    pub jump_limit: u32,
    pub attributes: AttributeSet,
    pub counters: Counters,
    pub anim_clock: f32,
    pub tick_interval: f32,
    pub frame: u32,
    pub facing_left: bool,
    /// Collision box relative to `position`.
    pub hitbox: Rect,
    pub variant: Variant,
    alive: bool,
    consumed: bool,
    /// Sub-pixel displacement not yet applied.
    carry: Vec2,
}

impl Entity {
    pub fn new(id: EntityId, variant: Variant, position: IVec2, hitbox: Rect, physics: &Physics) -> Self {
        let max_speed = match variant {
            Variant::Player(_) => Vec2::new(physics.run_speed, physics.terminal_speed),
            Variant::Enemy { speed, .. } => Vec2::new(speed, physics.terminal_speed),
            _ => Vec2::new(0.0, physics.terminal_speed),
        };
        let mut attributes = AttributeSet::empty();
        if variant.is_player() {
            attributes |= AttributeSet::LIGHT;
        }
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            // Vertical speeds never snap, so gravity integrates smoothly from rest.
            min_speed: Vec2::new(physics.min_speed, 0.0),
            max_speed,
            jump_count: 0,
            jump_limit: 1,
            attributes,
            counters: Counters::default(),
            anim_clock: 0.0,
            tick_interval: variant.tick_interval(),
            frame: 0,
            facing_left: matches!(variant, Variant::Enemy { .. }),
            hitbox,
            variant,
            alive: true,
            consumed: false,
            carry: Vec2::ZERO,
        }
    }

    /// Creates the entity for a spawn marker, with its hitbox taken from the tight
    /// bounds of its first sprite frame.
    pub fn spawn(
        id: EntityId,
        kind: SpawnKind,
        attributes: AttributeSet,
        position: IVec2,
        physics: &Physics,
        sprites: &SpriteAtlas,
    ) -> Self {
        let variant = match kind {
            SpawnKind::Player => Variant::Player(Default::default()),
            SpawnKind::Enemy(kind) => Variant::enemy(kind, physics),
            SpawnKind::Item(kind) => Variant::Item { kind, pop: None },
            SpawnKind::Flag => Variant::Flag,
            SpawnKind::Torch => Variant::Torch,
        };
        let mut entity = Self::new(id, variant, position, hitbox_for(&variant, sprites), physics);
        entity.attributes |= attributes;
        if entity.attributes.contains(AttributeSet::DOUBLE_JUMP) {
            entity.jump_limit = 2;
        }
        debug!(id, kind = ?kind, x = position.x, y = position.y, "Spawned entity");
        entity
    }

    /// Creates an item that rises out of a box and settles at `position`.
    pub fn revealed_item(id: EntityId, kind: variant::ItemKind, position: IVec2, ctx: &GameContext, sprites: &SpriteAtlas) -> Self {
        let variant = Variant::Item {
            kind,
            pop: Some(PopArc::new(position.y, ctx.zoom_f())),
        };
        let mut entity = Self::new(id, variant, position, hitbox_for(&variant, sprites), &ctx.physics);
        entity.attributes = kind.attribute().flag();
        entity
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the entity was picked up and should leave the active list.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// The collision box in world pixels.
    pub fn bounds(&self) -> Rect {
        self.hitbox.translated(self.position.x, self.position.y)
    }

    pub fn center(&self) -> IVec2 {
        self.bounds().center()
    }

    pub fn emits_light(&self) -> bool {
        self.attributes.contains(AttributeSet::LIGHT)
    }

    /// Consumes one jump credit and launches upward. Returns whether a credit was available.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if self.jump_count >= self.jump_limit {
            return false;
        }
        self.jump_count += 1;
        self.velocity.y = -velocity;
        true
    }

    /// Marks the entity dead and throws it upward; it falls through everything afterwards.
    pub fn kill(&mut self, physics: &Physics) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.counters.health = 0;
        self.acceleration.x = 0.0;
        self.velocity.x = 0.0;
        self.velocity.y = -physics.death_impulse;
        self.carry = Vec2::ZERO;
        debug!(id = self.id, x = self.position.x, y = self.position.y, "Entity died");
    }

    /// Applies an attribute: coins and health bump counters, the rest are stored.
    pub fn apply_attribute(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Coin(value) => self.counters.coins += value.value(),
            Attribute::Health => self.counters.health += 1,
            Attribute::DoubleJump => {
                self.attributes |= AttributeSet::DOUBLE_JUMP;
                self.jump_limit = self.jump_limit.max(2);
            }
            Attribute::Light => self.attributes |= AttributeSet::LIGHT,
        }
        trace!(id = self.id, ?attribute, "Applied attribute");
    }

    /// The atlas frame to draw this entity with.
    pub fn sprite(&self) -> SpriteRef {
        let (col, row) = self.variant.sprite_origin();
        let mirrored = match self.variant {
            Variant::Player(state) => state.looking_left,
            Variant::Enemy { .. } => self.facing_left,
            _ => false,
        };
        SpriteRef {
            col: col + self.frame,
            row,
            mirrored,
        }
    }

    fn animate(&mut self, dt: f32, moving: bool) {
        if !moving && !self.variant.animates_stationary() {
            return;
        }
        self.anim_clock += dt;
        if self.anim_clock > self.tick_interval {
            self.frame = (self.frame + 1) % self.variant.frame_limit().max(1);
            self.anim_clock = 0.0;
        }
    }

    /// Advances the entity by `dt` seconds against the level's regions.
    ///
    /// A zero, negative or non-finite `dt` is a no-op frame.
    pub fn update(&mut self, dt: f32, ctx: &GameContext, level: &LevelGeometry, input: &FrameInput) -> StepReport {
        let mut report = StepReport::default();
        if !(dt > 0.0 && dt.is_finite()) {
            return report;
        }
        let physics = &ctx.physics;
        let zoom = ctx.zoom_f();

        if !self.alive {
            self.velocity.y = integrate_axis(self.velocity.y, physics.gravity, dt, 0.0, physics.terminal_speed, physics.friction);
            let (dy, carry) = quantize(self.velocity.y, dt, zoom, self.carry.y);
            self.carry.y = carry;
            self.position.y += dy;
            report.outcome.moved.y = dy;
            return report;
        }

        if !self.variant.is_mobile() {
            if let Variant::Item { pop, .. } = &mut self.variant {
                if let Some(arc) = pop {
                    self.position.y = arc.advance(dt);
                    if arc.is_finished() {
                        *pop = None;
                    }
                }
            }
            self.animate(dt, false);
            return report;
        }

        // Behaviour: input or patrol decides accelerations for this frame.
        let climbing = level.climbable().intersects(&self.bounds());
        let mut variant = self.variant;
        let mut climb_intent = 0.0;
        match &mut variant {
            Variant::Player(state) => {
                state.climbing = climbing;
                if input.horizontal != 0 {
                    state.looking_left = input.horizontal < 0;
                }
                self.acceleration.x = f32::from(input.horizontal) * physics.run_acceleration;
                climb_intent = f32::from(input.vertical) * physics.climb_acceleration;
                self.max_speed.y = if climbing { physics.climb_speed } else { physics.terminal_speed };
                if input.jump {
                    report.jumped = self.jump(physics.jump_velocity);
                }
            }
            Variant::Enemy { speed, .. } => {
                self.velocity.x = if self.facing_left { -*speed } else { *speed };
            }
            _ => {}
        }
        self.variant = variant;

        let moving = self.velocity.x != 0.0 || (climbing && self.velocity.y != 0.0);
        self.animate(dt, moving);

        if !matches!(self.variant, Variant::Enemy { .. }) {
            self.velocity.x = integrate_axis(
                self.velocity.x,
                self.acceleration.x,
                dt,
                self.min_speed.x,
                self.max_speed.x,
                physics.friction,
            );
        }
        self.acceleration.y = if climbing {
            climb_intent
        } else if self.variant.affected_by_gravity() {
            physics.gravity
        } else {
            0.0
        };
        self.velocity.y = integrate_axis(
            self.velocity.y,
            self.acceleration.y,
            dt,
            self.min_speed.y,
            self.max_speed.y,
            physics.friction,
        );

        let world = level.world_size().as_ivec2();
        let touching_hazard = self.variant.is_player() && level.hazard().intersects(&self.bounds());
        if self.position.y > world.y || touching_hazard {
            self.kill(physics);
            report.died = true;
        }

        let (dx, carry_x) = quantize(self.velocity.x, dt, zoom, self.carry.x);
        let (dy, carry_y) = quantize(self.velocity.y, dt, zoom, self.carry.y);
        if !self.alive {
            self.carry = Vec2::new(0.0, carry_y);
            self.position += IVec2::new(dx, dy);
            report.outcome.moved = IVec2::new(dx, dy);
            return report;
        }

        let outcome = self.bounded_move(
            dx,
            dy,
            MoveBounds {
                solid: level.solid(),
                world_width: world.x,
                iteration_cap: ctx.move_iteration_cap,
            },
        );
        self.carry.x = if outcome.blocked_x { 0.0 } else { carry_x };
        self.carry.y = if outcome.landed || outcome.blocked_up { 0.0 } else { carry_y };
        if outcome.capped {
            debug!(id = self.id, dx, dy, "Bounded move hit its iteration cap");
        }
        report.outcome = outcome;
        report
    }
}

fn hitbox_for(variant: &Variant, sprites: &SpriteAtlas) -> Rect {
    let (col, row) = variant.sprite_origin();
    let frame = sprites.frame_size().as_ivec2();
    match sprites.tight_bounds(col, row) {
        Ok(bounds) if !bounds.is_empty() => bounds,
        Ok(_) => Rect::new(0, 0, frame.x, frame.y),
        Err(e) => {
            debug!(error = %e, "No sprite for entity, using the full frame as hitbox");
            Rect::new(0, 0, frame.x, frame.y)
        }
    }
}
