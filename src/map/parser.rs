//! Level parsing functionality for converting level text into a tile grid.

use glam::UVec2;
use tracing::{debug, trace};

use crate::entity::attribute::AttributeSet;
use crate::error::ParseError;
use crate::map::biome::Biome;
use crate::map::catalog::{SpawnKind, TileCatalog, TileDescriptor, AIR};

/// A rectangular grid of descriptors; short source lines are padded with air.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGrid {
    size: UVec2,
    cells: Vec<&'static TileDescriptor>,
}

impl LevelGrid {
    /// Builds a grid from rows of characters, padding every row to the longest one.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let start = cells.len();
            cells.extend(row.as_ref().chars().map(TileCatalog::lookup));
            cells.resize(start + width, &AIR);
        }
        Self {
            size: UVec2::new(width as u32, rows.len() as u32),
            cells,
        }
    }

    /// Columns and rows.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    /// Descriptor at a cell; anything outside the grid is air.
    pub fn get(&self, col: u32, row: u32) -> &'static TileDescriptor {
        if col >= self.size.x || row >= self.size.y {
            return &AIR;
        }
        self.cells[(row * self.size.x + col) as usize]
    }

    /// Every cell with its coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (UVec2, &'static TileDescriptor)> + '_ {
        let width = self.size.x.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, d)| (UVec2::new(i as u32 % width, i as u32 / width), *d))
    }
}

/// An entity spawn marker found in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub cell: UVec2,
    pub attributes: AttributeSet,
}

/// Represents the parsed data from a level source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLevel {
    pub biome: Biome,
    pub grid: LevelGrid,
    /// Spawn markers in row-major order.
    pub spawns: Vec<SpawnPoint>,
}

/// Parser for converting level text into structured level data.
pub struct LevelParser;

impl LevelParser {
    /// Parses a level source.
    ///
    /// The first line holds a single biome character; every following line is a grid row.
    /// Trailing blank lines are ignored, blank lines inside the grid are rows of air.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is empty, the biome line is not a single known
    /// biome code, or there are no grid rows. Nothing is produced on error.
    pub fn parse(source: &str) -> Result<ParsedLevel, ParseError> {
        let mut lines = source.lines();
        let biome_line = lines.next().map(str::trim_end).filter(|l| !l.is_empty()).ok_or(ParseError::Empty)?;

        let mut chars = biome_line.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(code), None) => code,
            _ => return Err(ParseError::MalformedBiome(biome_line.to_string())),
        };
        let biome = Biome::from_code(code)?;

        let mut rows: Vec<&str> = lines.map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|r| r.trim().is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(ParseError::NoRows);
        }

        let grid = LevelGrid::from_rows(&rows);
        let spawns: Vec<SpawnPoint> = grid
            .iter()
            .filter_map(|(cell, descriptor)| {
                descriptor.spawn.map(|kind| SpawnPoint {
                    kind,
                    cell,
                    attributes: descriptor.attributes,
                })
            })
            .collect();

        for spawn in &spawns {
            trace!(kind = ?spawn.kind, col = spawn.cell.x, row = spawn.cell.y, "Found spawn marker");
        }
        debug!(
            biome = biome.as_ref(),
            cols = grid.width(),
            rows = grid.height(),
            spawns = spawns.len(),
            "Parsed level"
        );

        Ok(ParsedLevel { biome, grid, spawns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::catalog::GeometryClass;

    #[test]
    fn test_ragged_rows_are_padded_with_air() {
        let grid = LevelGrid::from_rows(&["#", "###"]);
        assert_eq!(grid.size(), UVec2::new(3, 2));
        assert_eq!(grid.get(2, 0).class, GeometryClass::Air);
        assert_eq!(grid.get(2, 1).class, GeometryClass::SolidSquare);
        assert_eq!(grid.get(9, 9).class, GeometryClass::Air);
    }

    #[test]
    fn test_crlf_and_trailing_blank_lines() {
        let parsed = LevelParser::parse("d\r\n#.#\r\n\r\n\n").unwrap();
        assert_eq!(parsed.biome, Biome::Desert);
        assert_eq!(parsed.grid.size(), UVec2::new(3, 1));
    }
}
