//! The session object: owns the loaded level and its entities, drives one frame at a
//! time and exposes the read-only state a HUD needs.

use glam::IVec2;
use image::RgbaImage;
use strum_macros::AsRefStr;
use thousands::Separable;
use tracing::{debug, info, instrument, warn};

use crate::camera::Camera;
use crate::constants::{COIN_SCORE, STARTING_HEALTH, STOMP_SCORE};
use crate::context::GameContext;
use crate::entity::attribute::{Attribute, Counters};
use crate::entity::variant::{ItemKind, Variant};
use crate::entity::{Entity, EntityId};
use crate::error::{GameResult, ParseError};
use crate::events::GameEvent;
use crate::formatter;
use crate::input::{Bindings, FrameInput, InputState, VirtualKey};
use crate::map::catalog::SpawnKind;
use crate::map::geometry::LevelGeometry;
use crate::map::parser::{LevelParser, SpawnPoint};
use crate::texture::sprite::SpriteAtlas;

/// The atlases a session draws with.
pub struct Assets {
    /// Level tiles: one row per biome, then the block and decoration rows.
    pub tiles: SpriteAtlas,
    /// Entity frames, one row per variant.
    pub sprites: SpriteAtlas,
    /// Optional glyph atlas for centred messages.
    pub font: Option<SpriteAtlas>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum LevelState {
    #[default]
    Playing,
    Complete,
    Failed,
}

struct Level {
    geometry: LevelGeometry,
    /// The player is always at index 0.
    entities: Vec<Entity>,
    state: LevelState,
}

pub struct Game {
    ctx: GameContext,
    assets: Assets,
    camera: Camera,
    bindings: Bindings,
    input: InputState,
    level: Option<Level>,
    events: Vec<GameEvent>,
    ids: IdAllocator,
    score: u64,
}

/// Hands out entity ids for the whole session.
#[derive(Debug, Default)]
struct IdAllocator {
    next: EntityId,
}

impl IdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl Game {
    pub fn new(ctx: GameContext, assets: Assets) -> Self {
        Self {
            camera: Camera::new(&ctx),
            ctx,
            assets,
            bindings: Bindings::default(),
            input: InputState::default(),
            level: None,
            events: Vec::new(),
            ids: IdAllocator::default(),
            score: 0,
        }
    }

    /// Parses and builds a level, replacing the current one.
    ///
    /// Nothing changes on failure. The player's counters carry over from the previous level.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not parse or has no player spawn.
    #[instrument(skip_all, fields(bytes = source.len()))]
    pub fn load_level(&mut self, source: &str) -> GameResult<()> {
        let parsed = LevelParser::parse(source)?;
        let mut players = parsed.spawns.iter().filter(|s| s.kind == SpawnKind::Player);
        let player_spawn = *players.next().ok_or(ParseError::NoPlayer)?;
        if players.next().is_some() {
            warn!("Level has more than one player spawn, using the first");
        }

        let geometry = LevelGeometry::build(parsed, &self.assets.tiles);

        // Coins always carry over; a dead player comes back with fresh health.
        let counters = match self.player() {
            Some(player) if player.is_alive() && player.counters.health > 0 => player.counters,
            Some(player) => Counters {
                coins: player.counters.coins,
                health: STARTING_HEALTH,
            },
            None => Counters {
                coins: 0,
                health: STARTING_HEALTH,
            },
        };
        let mut player = self.spawn(&player_spawn, &geometry);
        player.counters = counters;

        let mut entities = vec![player];
        for spawn in geometry.spawns().iter().filter(|s| s.kind != SpawnKind::Player) {
            entities.push(self.spawn(spawn, &geometry));
        }

        info!(
            biome = geometry.biome().as_ref(),
            width = geometry.world_size().x,
            height = geometry.world_size().y,
            entities = entities.len(),
            "Level loaded"
        );
        self.input.clear();
        self.level = Some(Level {
            geometry,
            entities,
            state: LevelState::Playing,
        });
        Ok(())
    }

    fn spawn(&mut self, spawn: &SpawnPoint, geometry: &LevelGeometry) -> Entity {
        let id = self.ids.allocate();
        Entity::spawn(
            id,
            spawn.kind,
            spawn.attributes,
            geometry.cell_origin(spawn.cell),
            &self.ctx.physics,
            &self.assets.sprites,
        )
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Entities added or removed during the frame only join or leave the list at its end.
    pub fn update(&mut self, dt: f32) {
        formatter::increment_frame();

        let Some(level) = self.level.as_mut() else {
            return;
        };
        if level.state == LevelState::Complete {
            return;
        }

        let physics = self.ctx.physics;
        let input = self.input.frame();
        let mut pending: Vec<Entity> = Vec::new();
        let mut player_blocked_up = false;

        for (index, entity) in level.entities.iter_mut().enumerate() {
            let entity_input = if index == 0 { input } else { FrameInput::default() };
            let report = entity.update(dt, &self.ctx, &level.geometry, &entity_input);
            if index == 0 {
                player_blocked_up = report.outcome.blocked_up;
                if report.jumped {
                    self.events.push(GameEvent::Jumped);
                }
                if report.died {
                    self.events.push(GameEvent::PlayerDied);
                }
            }
        }

        // A head bump opens the box above the player.
        if let Some(player) = level.entities.first().filter(|p| player_blocked_up && p.is_alive()) {
            let probe = player.bounds().translated(0, -1);
            if let Some(item_box) = level.geometry.trigger_item_box(&probe, &self.assets.tiles) {
                self.events.push(GameEvent::BoxOpened {
                    col: item_box.cell.x,
                    row: item_box.cell.y,
                });
                if let Some(kind) = ItemKind::from_attributes(item_box.attributes) {
                    let tile_height = level.geometry.tile_size().y as i32;
                    let position = level.geometry.cell_origin(item_box.cell) - IVec2::new(0, tile_height);
                    let id = self.ids.allocate();
                    pending.push(Entity::revealed_item(id, kind, position, &self.ctx, &self.assets.sprites));
                }
            }
        }

        if let Some((player, others)) = level.entities.split_first_mut() {
            for other in others.iter_mut() {
                if !player.is_alive() {
                    break;
                }
                if !other.is_alive() || other.is_consumed() || !player.bounds().intersects(&other.bounds()) {
                    continue;
                }

                match other.variant {
                    Variant::Item { kind, pop: None } => {
                        let attribute = kind.attribute();
                        player.apply_attribute(attribute);
                        other.consume();
                        match attribute {
                            Attribute::Coin(value) => {
                                self.score += u64::from(value.value()) * COIN_SCORE;
                                self.events.push(GameEvent::CoinCollected { value: value.value() });
                            }
                            _ => self.events.push(GameEvent::PowerUp(attribute)),
                        }
                    }
                    Variant::Enemy { .. } => {
                        let (pb, eb) = (player.bounds(), other.bounds());
                        let stomped = player.velocity.y > 0.0 && pb.bottom() <= eb.y + eb.h / 2;
                        if stomped {
                            other.kill(&physics);
                            player.velocity.y = -physics.stomp_bounce;
                            self.score += STOMP_SCORE;
                            self.events.push(GameEvent::EnemyStomped(other.id));
                        } else if player.counters.health > 1 {
                            // Trade a point of health for the enemy.
                            player.counters.health -= 1;
                            other.kill(&physics);
                            debug!(health = player.counters.health, "Player hit");
                        } else {
                            player.kill(&physics);
                            self.events.push(GameEvent::PlayerDied);
                        }
                    }
                    Variant::Flag if level.state == LevelState::Playing => {
                        level.state = LevelState::Complete;
                        self.events.push(GameEvent::LevelComplete);
                        info!(score = self.score, "Level complete");
                    }
                    _ => {}
                }
            }

            if !player.is_alive() && level.state == LevelState::Playing {
                level.state = LevelState::Failed;
                info!(score = self.score, "Level failed");
            }
        }

        let floor = level.geometry.world_size().y as i32;
        let mut index = 0;
        level.entities.retain(|entity| {
            let keep = index == 0 || !(entity.is_consumed() || (!entity.is_alive() && entity.position.y > floor));
            index += 1;
            keep
        });
        level.entities.append(&mut pending);
    }

    /// Composes the current frame, or `None` without a level.
    pub fn render(&self) -> Option<RgbaImage> {
        let level = self.level.as_ref()?;
        let mut frame = self.camera.beam(&level.geometry, &self.assets.sprites, &level.entities, 0);
        let message = match level.state {
            LevelState::Playing => None,
            LevelState::Complete => Some("LEVEL COMPLETE"),
            LevelState::Failed => Some("GAME OVER"),
        };
        if let (Some(text), Some(font)) = (message, self.assets.font.as_ref()) {
            self.camera.show_msg(&mut frame, font, text);
        }
        Some(frame)
    }

    /// Forwards a named key event. Returns whether the name was recognised.
    pub fn key_event(&mut self, name: &str, pressed: bool) -> bool {
        match self.bindings.resolve(name) {
            Some(key) if pressed => self.key_down(key),
            Some(key) => self.key_up(key),
            None => {
                debug!(name, "Ignoring unbound key");
                return false;
            }
        }
        true
    }

    pub fn key_down(&mut self, key: VirtualKey) {
        self.input.press(key);
    }

    pub fn key_up(&mut self, key: VirtualKey) {
        self.input.release(key);
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn coins(&self) -> u32 {
        self.player().map_or(0, |p| p.counters.coins)
    }

    pub fn health(&self) -> u32 {
        self.player().map_or(0, |p| p.counters.health)
    }

    pub fn player_alive(&self) -> bool {
        self.player().is_some_and(Entity::is_alive)
    }

    pub fn state(&self) -> Option<LevelState> {
        self.level.as_ref().map(|l| l.state)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.level.as_ref().and_then(|l| l.entities.first())
    }

    pub fn entities(&self) -> &[Entity] {
        self.level.as_ref().map_or(&[][..], |l| l.entities.as_slice())
    }

    pub fn geometry(&self) -> Option<&LevelGeometry> {
        self.level.as_ref().map(|l| &l.geometry)
    }

    /// Takes every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Formats a score with thousands separators, e.g. `12,345`.
pub fn format_score(score: u64) -> String {
    score.separate_with_commas()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(1234567), "1,234,567");
    }
}
