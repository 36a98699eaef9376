use image::Rgba;
use strum_macros::{AsRefStr, EnumCount, EnumIter};

use crate::error::ParseError;

/// Visual theme of a level, selecting which tile-atlas row generic blocks draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum Biome {
    #[default]
    Grass,
    Desert,
    Snow,
    Cave,
}

impl Biome {
    /// Parses the single-character code on a level's first line.
    pub fn from_code(code: char) -> Result<Self, ParseError> {
        match code {
            'g' => Ok(Biome::Grass),
            'd' => Ok(Biome::Desert),
            's' => Ok(Biome::Snow),
            'c' => Ok(Biome::Cave),
            _ => Err(ParseError::UnknownBiome(code)),
        }
    }

    pub fn code(self) -> char {
        match self {
            Biome::Grass => 'g',
            Biome::Desert => 'd',
            Biome::Snow => 's',
            Biome::Cave => 'c',
        }
    }

    /// Colour the background is cleared to before tiles are drawn.
    pub fn sky_color(self) -> Rgba<u8> {
        match self {
            Biome::Grass => Rgba([146, 204, 244, 255]),
            Biome::Desert => Rgba([250, 214, 165, 255]),
            Biome::Snow => Rgba([208, 224, 240, 255]),
            Biome::Cave => Rgba([24, 20, 28, 255]),
        }
    }

    /// Tile-atlas row holding this biome's generic blocks.
    pub fn atlas_row(self) -> u32 {
        self as u32
    }
}
