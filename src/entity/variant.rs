//! Variant-specific state and tuning for each kind of entity.

use crate::constants::{animation, sprite_rows};
use crate::context::Physics;
use crate::entity::attribute::{Attribute, AttributeSet, CoinValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Walks, falls, turns at walls.
    Slime,
    /// Flies level, ignores gravity, turns at walls.
    Fly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    BronzeCoin,
    SilverCoin,
    GoldCoin,
    Heart,
    Feather,
}

impl ItemKind {
    /// The attribute granted on pickup.
    pub fn attribute(self) -> Attribute {
        match self {
            ItemKind::BronzeCoin => Attribute::Coin(CoinValue::Bronze),
            ItemKind::SilverCoin => Attribute::Coin(CoinValue::Silver),
            ItemKind::GoldCoin => Attribute::Coin(CoinValue::Gold),
            ItemKind::Heart => Attribute::Health,
            ItemKind::Feather => Attribute::DoubleJump,
        }
    }

    /// The item revealed by an item box carrying `attributes`.
    pub fn from_attributes(attributes: AttributeSet) -> Option<Self> {
        attributes.attributes().find_map(|attribute| match attribute {
            Attribute::Coin(CoinValue::Bronze) => Some(ItemKind::BronzeCoin),
            Attribute::Coin(CoinValue::Silver) => Some(ItemKind::SilverCoin),
            Attribute::Coin(CoinValue::Gold) => Some(ItemKind::GoldCoin),
            Attribute::Health => Some(ItemKind::Heart),
            Attribute::DoubleJump => Some(ItemKind::Feather),
            Attribute::Light => None,
        })
    }

    fn sprite_col(self) -> u32 {
        self as u32
    }
}

/// A timed rise-and-settle played by an item revealed from a box.
///
/// Advanced once per frame by the main loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopArc {
    elapsed: f32,
    duration: f32,
    /// Peak height in world pixels.
    height: f32,
    base_y: i32,
}

impl PopArc {
    pub fn new(base_y: i32, zoom: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: animation::POP_DURATION,
            height: animation::POP_HEIGHT * zoom,
            base_y,
        }
    }

    /// Advances the arc and returns the entity's vertical position for this frame.
    pub fn advance(&mut self, dt: f32) -> i32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.elapsed / self.duration;
        let lift = self.height * (std::f32::consts::PI * t).sin();
        self.base_y - lift.round() as i32
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerState {
    /// Set while overlapping the climbable region.
    pub climbing: bool,
    /// Direction of the last horizontal input, used for drawing.
    pub looking_left: bool,
}

/// Tagged variant carried by every entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Player(PlayerState),
    Enemy { kind: EnemyKind, speed: f32 },
    Item { kind: ItemKind, pop: Option<PopArc> },
    Flag,
    Torch,
}

impl Variant {
    pub fn enemy(kind: EnemyKind, physics: &Physics) -> Self {
        let speed = match kind {
            EnemyKind::Slime => physics.slime_speed,
            EnemyKind::Fly => physics.fly_speed,
        };
        Variant::Enemy { kind, speed }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Variant::Player(_))
    }

    /// Whether the entity moves through the physics step at all.
    pub fn is_mobile(&self) -> bool {
        matches!(self, Variant::Player(_) | Variant::Enemy { .. })
    }

    pub fn affected_by_gravity(&self) -> bool {
        !matches!(self, Variant::Enemy { kind: EnemyKind::Fly, .. })
    }

    /// Whether the animation advances even when the entity is not moving.
    pub fn animates_stationary(&self) -> bool {
        matches!(self, Variant::Flag | Variant::Torch | Variant::Enemy { kind: EnemyKind::Fly, .. })
    }

    /// Seconds per animation frame.
    pub fn tick_interval(&self) -> f32 {
        match self {
            Variant::Player(_) => animation::PLAYER_TICK,
            Variant::Enemy { kind: EnemyKind::Slime, .. } => animation::SLIME_TICK,
            Variant::Enemy { kind: EnemyKind::Fly, .. } => animation::FLY_TICK,
            Variant::Flag => animation::FLAG_TICK,
            Variant::Torch => animation::TORCH_TICK,
            Variant::Item { .. } => f32::INFINITY,
        }
    }

    /// Number of animation frames before wrapping.
    pub fn frame_limit(&self) -> u32 {
        match self {
            Variant::Player(_) => animation::PLAYER_FRAMES,
            Variant::Enemy { kind: EnemyKind::Slime, .. } => animation::SLIME_FRAMES,
            Variant::Enemy { kind: EnemyKind::Fly, .. } => animation::FLY_FRAMES,
            Variant::Flag => animation::FLAG_FRAMES,
            Variant::Torch => animation::TORCH_FRAMES,
            Variant::Item { .. } => 1,
        }
    }

    /// Entity-atlas row and first column of this variant's frames.
    pub fn sprite_origin(&self) -> (u32, u32) {
        match self {
            Variant::Player(_) => (0, sprite_rows::PLAYER),
            Variant::Enemy { kind: EnemyKind::Slime, .. } => (0, sprite_rows::SLIME),
            Variant::Enemy { kind: EnemyKind::Fly, .. } => (0, sprite_rows::FLY),
            Variant::Item { kind, .. } => (kind.sprite_col(), sprite_rows::ITEM),
            Variant::Flag => (0, sprite_rows::FLAG),
            Variant::Torch => (0, sprite_rows::TORCH),
        }
    }
}
