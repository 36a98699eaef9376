//! The fixed character table mapping level characters to tile descriptors.

use phf::phf_map;
use strum::EnumCount;

use crate::entity::attribute::AttributeSet;
use crate::entity::variant::{EnemyKind, ItemKind};
use crate::map::biome::Biome;

/// How a tile participates in collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryClass {
    Air,
    /// Contributes its full cell to the solid region.
    SolidSquare,
    /// Contributes the pixel silhouette of its sprite to the solid region.
    SolidNonSquare,
    /// Drawn, never collided with.
    Passable,
    /// Solid, and a one-shot trigger.
    ItemBox,
    Climbable,
    Hazard,
}

/// An entity spawned at a tile's position when the level loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    Player,
    Enemy(EnemyKind),
    Item(ItemKind),
    Flag,
    Torch,
}

/// Where a tile's sprite lives in the tile atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileFrame {
    /// A column of the level biome's row.
    Biome(u32),
    Fixed { col: u32, row: u32 },
}

impl TileFrame {
    pub fn resolve(self, biome: Biome) -> (u32, u32) {
        match self {
            TileFrame::Biome(col) => (col, biome.atlas_row()),
            TileFrame::Fixed { col, row } => (col, row),
        }
    }
}

/// Immutable description of one level character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileDescriptor {
    pub symbol: char,
    pub name: &'static str,
    pub class: GeometryClass,
    pub frame: Option<TileFrame>,
    pub spawn: Option<SpawnKind>,
    pub attributes: AttributeSet,
}

/// First atlas row after the biome rows: biome-independent blocks.
pub const BLOCK_ROW: u32 = Biome::COUNT as u32;
/// Row of decorative passable sprites.
pub const DECOR_ROW: u32 = BLOCK_ROW + 1;
/// Frame drawn over an item box once it has been triggered.
pub const SPENT_BOX_FRAME: TileFrame = TileFrame::Fixed { col: 8, row: BLOCK_ROW };

impl TileDescriptor {
    const fn new(symbol: char, name: &'static str, class: GeometryClass, frame: Option<TileFrame>) -> Self {
        Self {
            symbol,
            name,
            class,
            frame,
            spawn: None,
            attributes: AttributeSet::empty(),
        }
    }

    const fn biome(symbol: char, name: &'static str, class: GeometryClass, col: u32) -> Self {
        Self::new(symbol, name, class, Some(TileFrame::Biome(col)))
    }

    const fn fixed(symbol: char, name: &'static str, class: GeometryClass, col: u32, row: u32) -> Self {
        Self::new(symbol, name, class, Some(TileFrame::Fixed { col, row }))
    }

    const fn item_box(symbol: char, name: &'static str, attributes: AttributeSet) -> Self {
        let mut descriptor = Self::fixed(symbol, name, GeometryClass::ItemBox, 7, BLOCK_ROW);
        descriptor.attributes = attributes;
        descriptor
    }

    const fn spawn(symbol: char, name: &'static str, spawn: SpawnKind, attributes: AttributeSet) -> Self {
        let mut descriptor = Self::new(symbol, name, GeometryClass::Air, None);
        descriptor.spawn = Some(spawn);
        descriptor.attributes = attributes;
        descriptor
    }

    pub fn is_solid(&self) -> bool {
        matches!(
            self.class,
            GeometryClass::SolidSquare | GeometryClass::SolidNonSquare | GeometryClass::ItemBox
        )
    }
}

pub const AIR: TileDescriptor = TileDescriptor::new(' ', "air", GeometryClass::Air, None);

static TILES: phf::Map<char, TileDescriptor> = phf_map! {
    ' ' => AIR,
    '.' => TileDescriptor::new('.', "air", GeometryClass::Air, None),

    '#' => TileDescriptor::biome('#', "ground", GeometryClass::SolidSquare, 0),
    '=' => TileDescriptor::biome('=', "surface", GeometryClass::SolidSquare, 1),
    '/' => TileDescriptor::biome('/', "ramp-up", GeometryClass::SolidNonSquare, 2),
    '\\' => TileDescriptor::biome('\\', "ramp-down", GeometryClass::SolidNonSquare, 3),
    '_' => TileDescriptor::biome('_', "half-block", GeometryClass::SolidNonSquare, 4),
    '-' => TileDescriptor::biome('-', "ledge", GeometryClass::SolidNonSquare, 5),
    '[' => TileDescriptor::biome('[', "corner-left", GeometryClass::SolidNonSquare, 6),
    ']' => TileDescriptor::biome(']', "corner-right", GeometryClass::SolidNonSquare, 7),
    '~' => TileDescriptor::biome('~', "backdrop", GeometryClass::Passable, 8),
    '"' => TileDescriptor::biome('"', "tuft", GeometryClass::Passable, 9),

    'B' => TileDescriptor::fixed('B', "brick", GeometryClass::SolidSquare, 0, BLOCK_ROW),
    'M' => TileDescriptor::fixed('M', "metal", GeometryClass::SolidSquare, 1, BLOCK_ROW),
    'W' => TileDescriptor::fixed('W', "crate", GeometryClass::SolidSquare, 2, BLOCK_ROW),
    'H' => TileDescriptor::fixed('H', "ladder", GeometryClass::Climbable, 3, BLOCK_ROW),
    'V' => TileDescriptor::fixed('V', "vine", GeometryClass::Climbable, 4, BLOCK_ROW),
    '^' => TileDescriptor::fixed('^', "spikes", GeometryClass::Hazard, 5, BLOCK_ROW),
    'L' => TileDescriptor::fixed('L', "lava", GeometryClass::Hazard, 6, BLOCK_ROW),
    '?' => TileDescriptor::item_box('?', "bronze-box", AttributeSet::COIN_BRONZE),
    '$' => TileDescriptor::item_box('$', "silver-box", AttributeSet::COIN_SILVER),
    '&' => TileDescriptor::item_box('&', "gold-box", AttributeSet::COIN_GOLD),
    '+' => TileDescriptor::item_box('+', "heart-box", AttributeSet::HEALTH),
    '*' => TileDescriptor::item_box('*', "feather-box", AttributeSet::DOUBLE_JUMP),

    'f' => TileDescriptor::fixed('f', "flower", GeometryClass::Passable, 0, DECOR_ROW),
    't' => TileDescriptor::fixed('t', "tall-grass", GeometryClass::Passable, 1, DECOR_ROW),
    'r' => TileDescriptor::fixed('r', "rock", GeometryClass::Passable, 2, DECOR_ROW),
    'u' => TileDescriptor::fixed('u', "mushroom", GeometryClass::Passable, 3, DECOR_ROW),
    'k' => TileDescriptor::fixed('k', "sign", GeometryClass::Passable, 4, DECOR_ROW),
    'n' => TileDescriptor::fixed('n', "fence", GeometryClass::Passable, 5, DECOR_ROW),
    'x' => TileDescriptor::fixed('x', "bones", GeometryClass::Passable, 6, DECOR_ROW),

    'P' => TileDescriptor::spawn('P', "player", SpawnKind::Player, AttributeSet::LIGHT),
    'S' => TileDescriptor::spawn('S', "slime", SpawnKind::Enemy(EnemyKind::Slime), AttributeSet::empty()),
    'F' => TileDescriptor::spawn('F', "fly", SpawnKind::Enemy(EnemyKind::Fly), AttributeSet::empty()),
    'o' => TileDescriptor::spawn('o', "bronze-coin", SpawnKind::Item(ItemKind::BronzeCoin), AttributeSet::COIN_BRONZE),
    'O' => TileDescriptor::spawn('O', "silver-coin", SpawnKind::Item(ItemKind::SilverCoin), AttributeSet::COIN_SILVER),
    '0' => TileDescriptor::spawn('0', "gold-coin", SpawnKind::Item(ItemKind::GoldCoin), AttributeSet::COIN_GOLD),
    'h' => TileDescriptor::spawn('h', "heart", SpawnKind::Item(ItemKind::Heart), AttributeSet::HEALTH),
    'j' => TileDescriptor::spawn('j', "feather", SpawnKind::Item(ItemKind::Feather), AttributeSet::DOUBLE_JUMP),
    'G' => TileDescriptor::spawn('G', "flag", SpawnKind::Flag, AttributeSet::empty()),
    'T' => TileDescriptor::spawn('T', "torch", SpawnKind::Torch, AttributeSet::LIGHT),
};

/// Lookup into the fixed character table.
pub struct TileCatalog;

impl TileCatalog {
    /// Returns the descriptor for `symbol`; unknown characters are air.
    pub fn lookup(symbol: char) -> &'static TileDescriptor {
        TILES.get(&symbol).unwrap_or(&AIR)
    }

    /// Whether `symbol` has its own entry in the table.
    pub fn is_known(symbol: char) -> bool {
        TILES.contains_key(&symbol)
    }

    pub fn entries() -> impl Iterator<Item = &'static TileDescriptor> {
        TILES.values()
    }
}
