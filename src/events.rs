use crate::entity::attribute::Attribute;
use crate::entity::EntityId;

/// Things that happened during an update, queued for the HUD or audio layer to drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    CoinCollected { value: u32 },
    PowerUp(Attribute),
    BoxOpened { col: u32, row: u32 },
    EnemyStomped(EntityId),
    PlayerDied,
    LevelComplete,
}
