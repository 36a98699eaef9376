//! Simulation core of a tile-based platform game.

pub mod camera;
pub mod constants;
pub mod context;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod input;
pub mod map;
pub mod region;
pub mod texture;
