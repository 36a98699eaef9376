//! Centralized error types for the simulation core.
//!
//! Level and atlas loading are all-or-nothing: every error here is produced before
//! any state is committed, so a caller can keep whatever it had before.

use std::io;

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Level parsing error: {0}")]
    LevelParse(#[from] ParseError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Error type for level source parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Level source is empty")]
    Empty,
    #[error("Biome line must be a single character, found {0:?}")]
    MalformedBiome(String),
    #[error("Unknown biome code: {0:?}")]
    UnknownBiome(char),
    #[error("Level has no grid rows")]
    NoRows,
    #[error("Level has no player spawn")]
    NoPlayer,
}

/// Errors related to atlases and frame lookups.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("Invalid atlas configuration: {0}")]
    InvalidConfig(String),

    #[error("Frame ({col}, {row}) is outside the {cols}x{rows} atlas grid")]
    FrameOutOfRange { col: u32, row: u32, cols: u32, rows: u32 },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
