//! Attributes carried by tiles and entities.

use bitflags::bitflags;

bitflags! {
    /// The attribute set stored on descriptors and entities.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AttributeSet: u8 {
        const DOUBLE_JUMP = 1 << 0;
        const LIGHT = 1 << 1;
        const COIN_BRONZE = 1 << 2;
        const COIN_SILVER = 1 << 3;
        const COIN_GOLD = 1 << 4;
        const HEALTH = 1 << 5;
    }
}

/// Value tier of a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinValue {
    Bronze,
    Silver,
    Gold,
}

impl CoinValue {
    pub fn value(self) -> u32 {
        match self {
            CoinValue::Bronze => 1,
            CoinValue::Silver => 10,
            CoinValue::Gold => 100,
        }
    }
}

/// A single attribute, as applied to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    DoubleJump,
    Light,
    Coin(CoinValue),
    Health,
}

impl Attribute {
    /// Whether applying this attribute only bumps a counter instead of being stored.
    pub fn is_instant(self) -> bool {
        matches!(self, Attribute::Coin(_) | Attribute::Health)
    }

    pub fn flag(self) -> AttributeSet {
        match self {
            Attribute::DoubleJump => AttributeSet::DOUBLE_JUMP,
            Attribute::Light => AttributeSet::LIGHT,
            Attribute::Coin(CoinValue::Bronze) => AttributeSet::COIN_BRONZE,
            Attribute::Coin(CoinValue::Silver) => AttributeSet::COIN_SILVER,
            Attribute::Coin(CoinValue::Gold) => AttributeSet::COIN_GOLD,
            Attribute::Health => AttributeSet::HEALTH,
        }
    }
}

impl AttributeSet {
    /// Expands the set into individual attributes.
    pub fn attributes(self) -> impl Iterator<Item = Attribute> {
        [
            Attribute::DoubleJump,
            Attribute::Light,
            Attribute::Coin(CoinValue::Bronze),
            Attribute::Coin(CoinValue::Silver),
            Attribute::Coin(CoinValue::Gold),
            Attribute::Health,
        ]
        .into_iter()
        .filter(move |a| self.contains(a.flag()))
    }
}

/// Counters bumped by instant attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub coins: u32,
    pub health: u32,
}
