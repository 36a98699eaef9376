//! Named virtual keys and the held-key state the player reads each frame.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use strum_macros::{AsRefStr, EnumIter, EnumString};
use tracing::trace;

/// Keys the simulation understands, independent of any keyboard device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum VirtualKey {
    #[strum(serialize = "VK_LEFT", serialize = "LEFT")]
    Left,
    #[strum(serialize = "VK_RIGHT", serialize = "RIGHT")]
    Right,
    #[strum(serialize = "VK_UP", serialize = "UP")]
    Up,
    #[strum(serialize = "VK_DOWN", serialize = "DOWN")]
    Down,
    #[strum(serialize = "VK_SPACE", serialize = "SPACE", serialize = "JUMP")]
    Jump,
}

/// Extra key names mapped onto virtual keys, on top of the canonical names.
#[derive(Debug, Clone)]
pub struct Bindings {
    aliases: HashMap<String, VirtualKey>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut aliases = HashMap::new();

        aliases.insert("A".to_string(), VirtualKey::Left);
        aliases.insert("VK_A".to_string(), VirtualKey::Left);
        aliases.insert("D".to_string(), VirtualKey::Right);
        aliases.insert("VK_D".to_string(), VirtualKey::Right);
        aliases.insert("W".to_string(), VirtualKey::Up);
        aliases.insert("VK_W".to_string(), VirtualKey::Up);
        aliases.insert("S".to_string(), VirtualKey::Down);
        aliases.insert("VK_S".to_string(), VirtualKey::Down);
        aliases.insert("Z".to_string(), VirtualKey::Jump);
        aliases.insert("VK_Z".to_string(), VirtualKey::Jump);

        Self { aliases }
    }
}

impl Bindings {
    /// Binds an additional name to `key`. Names are matched case-insensitively.
    pub fn bind(&mut self, name: &str, key: VirtualKey) {
        self.aliases.insert(name.to_ascii_uppercase(), key);
    }

    /// Resolves a key name, trying aliases before the canonical names.
    pub fn resolve(&self, name: &str) -> Option<VirtualKey> {
        let name = name.trim();
        self.aliases
            .get(&name.to_ascii_uppercase())
            .copied()
            .or_else(|| VirtualKey::from_str(name).ok())
    }
}

/// Input distilled for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// -1 left, 1 right, 0 neither or both.
    pub horizontal: i8,
    /// -1 up, 1 down.
    pub vertical: i8,
    /// A jump press happened since the last frame.
    pub jump: bool,
}

/// Tracks held keys between frames. Jump is edge-triggered: holding it jumps once.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<VirtualKey>,
    jump_pending: bool,
}

impl InputState {
    pub fn press(&mut self, key: VirtualKey) {
        if key == VirtualKey::Jump && !self.held.contains(&key) {
            self.jump_pending = true;
        }
        if self.held.insert(key) {
            trace!(key = key.as_ref(), "Key pressed");
        }
    }

    pub fn release(&mut self, key: VirtualKey) {
        if self.held.remove(&key) {
            trace!(key = key.as_ref(), "Key released");
        }
    }

    pub fn is_held(&self, key: VirtualKey) -> bool {
        self.held.contains(&key)
    }

    /// Forgets all held keys and any pending jump.
    pub fn clear(&mut self) {
        self.held.clear();
        self.jump_pending = false;
    }

    /// Snapshot for the coming frame; consumes the pending jump.
    pub fn frame(&mut self) -> FrameInput {
        let axis = |negative: VirtualKey, positive: VirtualKey| -> i8 {
            i8::from(self.held.contains(&positive)) - i8::from(self.held.contains(&negative))
        };
        let input = FrameInput {
            horizontal: axis(VirtualKey::Left, VirtualKey::Right),
            vertical: axis(VirtualKey::Up, VirtualKey::Down),
            jump: self.jump_pending,
        };
        self.jump_pending = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_canonical_names_resolve() {
        let bindings = Bindings::default();
        assert_eq!(bindings.resolve("VK_LEFT"), Some(VirtualKey::Left));
        assert_eq!(bindings.resolve("right"), Some(VirtualKey::Right));
        assert_eq!(bindings.resolve("VK_SPACE"), Some(VirtualKey::Jump));
        assert_eq!(bindings.resolve("a"), Some(VirtualKey::Left));
        assert_eq!(bindings.resolve("VK_F12"), None);
    }

    #[test]
    fn test_every_key_round_trips_through_its_name() {
        let bindings = Bindings::default();
        for key in VirtualKey::iter() {
            assert_eq!(bindings.resolve(key.as_ref()), Some(key));
        }
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut state = InputState::default();
        state.press(VirtualKey::Left);
        state.press(VirtualKey::Right);
        assert_eq!(state.frame().horizontal, 0);
        state.release(VirtualKey::Right);
        assert_eq!(state.frame().horizontal, -1);
    }

    #[test]
    fn test_jump_fires_once_per_press() {
        let mut state = InputState::default();
        state.press(VirtualKey::Jump);
        assert!(state.frame().jump);
        // Key repeat while held must not jump again.
        state.press(VirtualKey::Jump);
        assert!(!state.frame().jump);
        state.release(VirtualKey::Jump);
        state.press(VirtualKey::Jump);
        assert!(state.frame().jump);
    }
}
