//! Session-wide configuration, constructed once and passed by reference into the
//! simulation, the geometry builder and the camera.

use glam::UVec2;

use crate::constants::{self, physics};

/// Physics tuning shared by every entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub friction: f32,
    pub min_speed: f32,
    pub run_acceleration: f32,
    pub run_speed: f32,
    pub terminal_speed: f32,
    pub jump_velocity: f32,
    pub climb_acceleration: f32,
    pub climb_speed: f32,
    pub death_impulse: f32,
    pub stomp_bounce: f32,
    pub slime_speed: f32,
    pub fly_speed: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: physics::GRAVITY,
            friction: physics::FRICTION,
            min_speed: physics::MIN_SPEED,
            run_acceleration: physics::RUN_ACCELERATION,
            run_speed: physics::RUN_SPEED,
            terminal_speed: physics::TERMINAL_SPEED,
            jump_velocity: physics::JUMP_VELOCITY,
            climb_acceleration: physics::CLIMB_ACCELERATION,
            climb_speed: physics::CLIMB_SPEED,
            death_impulse: physics::DEATH_IMPULSE,
            stomp_bounce: physics::STOMP_BOUNCE,
            slime_speed: physics::SLIME_SPEED,
            fly_speed: physics::FLY_SPEED,
        }
    }
}

/// Explicit context object owned by the top-level session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameContext {
    /// Integer zoom; atlases are scaled by it and displacements multiplied by it.
    pub zoom: u32,
    /// Visible area, in world pixels.
    pub viewport: UVec2,
    pub physics: Physics,
    /// Radius of each light cut, in unzoomed pixels.
    pub light_radius: f32,
    /// Whether frames are darkened outside of light sources.
    pub darken: bool,
    pub move_iteration_cap: u32,
}

impl Default for GameContext {
    fn default() -> Self {
        Self {
            zoom: constants::ZOOM,
            viewport: constants::VIEWPORT_SIZE,
            physics: Physics::default(),
            light_radius: constants::LIGHT_RADIUS,
            darken: false,
            move_iteration_cap: constants::MOVE_ITERATION_CAP,
        }
    }
}

impl GameContext {
    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom.max(1);
        self
    }

    pub fn with_viewport(mut self, viewport: UVec2) -> Self {
        self.viewport = viewport.max(UVec2::ONE);
        self
    }

    pub fn with_darkness(mut self, darken: bool) -> Self {
        self.darken = darken;
        self
    }

    pub fn zoom_f(&self) -> f32 {
        self.zoom as f32
    }
}
