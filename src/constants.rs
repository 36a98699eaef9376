//! This module contains all the constants used by the simulation.
//!
//! Speeds are in unzoomed sprite pixels per second; the zoom factor converts them to world pixels.

use std::time::Duration;

use glam::UVec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each atlas cell (tile or sprite), in unzoomed pixels.
pub const TILE_SIZE: u32 = 16;

/// Default integer zoom applied to atlases and displacements.
pub const ZOOM: u32 = 2;

/// Default viewport size, in world pixels.
pub const VIEWPORT_SIZE: UVec2 = UVec2::new(640, 480);

/// Upper bound on unit steps taken by a single bounded move.
pub const MOVE_ITERATION_CAP: u32 = 1000;

pub mod physics {
    pub const GRAVITY: f32 = 900.0;
    pub const FRICTION: f32 = 600.0;
    /// Horizontal speeds below this snap (up when accelerating, to zero when decaying).
    pub const MIN_SPEED: f32 = 5.0;
    pub const RUN_ACCELERATION: f32 = 500.0;
    pub const RUN_SPEED: f32 = 120.0;
    pub const TERMINAL_SPEED: f32 = 400.0;
    pub const JUMP_VELOCITY: f32 = 300.0;
    pub const CLIMB_ACCELERATION: f32 = 400.0;
    pub const CLIMB_SPEED: f32 = 80.0;
    /// Upward impulse applied when an entity dies.
    pub const DEATH_IMPULSE: f32 = 250.0;
    /// Upward velocity given to a player after stomping an enemy.
    pub const STOMP_BOUNCE: f32 = 200.0;
    pub const SLIME_SPEED: f32 = 30.0;
    pub const FLY_SPEED: f32 = 45.0;
}

pub mod animation {
    /// Seconds between frames, and the number of frames before wrapping.
    pub const PLAYER_TICK: f32 = 0.1;
    pub const PLAYER_FRAMES: u32 = 4;
    pub const SLIME_TICK: f32 = 0.25;
    pub const SLIME_FRAMES: u32 = 2;
    pub const FLY_TICK: f32 = 0.08;
    pub const FLY_FRAMES: u32 = 2;
    pub const FLAG_TICK: f32 = 0.2;
    pub const FLAG_FRAMES: u32 = 2;
    pub const TORCH_TICK: f32 = 0.15;
    pub const TORCH_FRAMES: u32 = 3;

    /// Length of the rise played by an item revealed from a box.
    pub const POP_DURATION: f32 = 0.4;
    /// Peak height of that rise, in unzoomed pixels.
    pub const POP_HEIGHT: f32 = 16.0;
}

/// Rows of the entity atlas, one per entity kind.
pub mod sprite_rows {
    pub const PLAYER: u32 = 0;
    pub const SLIME: u32 = 1;
    pub const FLY: u32 = 2;
    pub const ITEM: u32 = 3;
    pub const FLAG: u32 = 4;
    pub const TORCH: u32 = 5;
}

/// Radius of the light cut around each light-emitting entity, in unzoomed pixels.
pub const LIGHT_RADIUS: f32 = 48.0;

/// Score awarded per unit of coin value.
pub const COIN_SCORE: u64 = 10;
/// Score awarded for stomping an enemy.
pub const STOMP_SCORE: u64 = 100;

pub const STARTING_HEALTH: u32 = 1;
