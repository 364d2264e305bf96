//! Directional input.
//!
//! Key events are folded into a [`KeyboardState`] as they arrive; once per
//! tick the game loop samples it into an immutable [`InputSnapshot`] so the
//! motion resolver never sees input change mid-resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::player::Direction;

/// Held directions sampled at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Up held
    #[serde(default)]
    pub up: bool,
    /// Down held
    #[serde(default)]
    pub down: bool,
    /// Left held
    #[serde(default)]
    pub left: bool,
    /// Right held
    #[serde(default)]
    pub right: bool,
}

impl InputSnapshot {
    /// No keys held.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Creates a snapshot from the four flags.
    #[must_use]
    pub const fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Parses a compact `wasd` string, e.g. `"wd"` for up-right.
    ///
    /// Unknown characters are ignored.
    #[must_use]
    pub fn from_wasd(keys: &str) -> Self {
        let mut snapshot = Self::NONE;
        for c in keys.chars() {
            match c.to_ascii_lowercase() {
                'w' => snapshot.up = true,
                'a' => snapshot.left = true,
                's' => snapshot.down = true,
                'd' => snapshot.right = true,
                _ => {},
            }
        }
        snapshot
    }

    /// Per-axis displacement; opposite keys cancel out.
    #[must_use]
    pub fn move_vector(&self, speed: f64) -> (f64, f64) {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        };
        (axis(self.left, self.right), axis(self.up, self.down))
    }

    /// Facing implied by the held keys. Up wins over down, down over left,
    /// left over right.
    #[must_use]
    pub fn facing(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Returns true if any direction is held.
    #[must_use]
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
}

impl KeyCode {
    /// Maps a DOM-style key name (`"w"`, `"W"`, `"ArrowUp"`, ...) to a key.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "w" | "W" => Some(Self::W),
            "a" | "A" => Some(Self::A),
            "s" | "S" => Some(Self::S),
            "d" | "D" => Some(Self::D),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        }
    }

    /// Direction this key steers toward.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::W | Self::ArrowUp => Direction::Up,
            Self::S | Self::ArrowDown => Direction::Down,
            Self::A | Self::ArrowLeft => Direction::Left,
            Self::D | Self::ArrowRight => Direction::Right,
        }
    }
}

/// Tracks which keys are currently held.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Creates a state with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press or release.
    pub fn update_key(&mut self, key: KeyCode, is_pressed: bool) {
        if is_pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// Records a key event by DOM key name. Unknown keys are ignored.
    pub fn update_key_name(&mut self, name: &str, is_pressed: bool) {
        if let Some(key) = KeyCode::from_key_name(name) {
            self.update_key(key, is_pressed);
        }
    }

    /// Checks if a key is held.
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Samples the held keys into a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::NONE;
        for key in &self.held {
            match key.direction() {
                Direction::Up => snapshot.up = true,
                Direction::Down => snapshot.down = true,
                Direction::Left => snapshot.left = true,
                Direction::Right => snapshot.right = true,
            }
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_vector() {
        assert_eq!(InputSnapshot::NONE.move_vector(2.0), (0.0, 0.0));
        assert_eq!(InputSnapshot::from_wasd("d").move_vector(2.0), (2.0, 0.0));
        assert_eq!(InputSnapshot::from_wasd("wa").move_vector(2.0), (-2.0, -2.0));
        assert_eq!(InputSnapshot::from_wasd("s").move_vector(1.5), (0.0, 1.5));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        assert_eq!(InputSnapshot::from_wasd("ad").move_vector(1.0), (0.0, 0.0));
        assert_eq!(InputSnapshot::from_wasd("wsd").move_vector(1.0), (1.0, 0.0));
    }

    #[test]
    fn test_facing_priority() {
        assert_eq!(InputSnapshot::from_wasd("wd").facing(), Some(Direction::Up));
        assert_eq!(InputSnapshot::from_wasd("sa").facing(), Some(Direction::Down));
        assert_eq!(InputSnapshot::from_wasd("ad").facing(), Some(Direction::Left));
        assert_eq!(InputSnapshot::from_wasd("D").facing(), Some(Direction::Right));
        assert_eq!(InputSnapshot::NONE.facing(), None);
    }

    #[test]
    fn test_keyboard_state_snapshot() {
        let mut keyboard = KeyboardState::new();
        keyboard.update_key_name("W", true);
        keyboard.update_key_name("ArrowRight", true);
        keyboard.update_key_name("Shift", true);

        let snapshot = keyboard.snapshot();
        assert_eq!(snapshot, InputSnapshot::new(true, false, false, true));
        assert!(keyboard.is_key_pressed(KeyCode::W));

        keyboard.update_key_name("w", false);
        assert_eq!(keyboard.snapshot(), InputSnapshot::new(false, false, false, true));

        keyboard.clear();
        assert!(!keyboard.snapshot().any());
    }

    #[test]
    fn test_arrow_and_letter_share_direction() {
        let mut keyboard = KeyboardState::new();
        keyboard.update_key(KeyCode::A, true);
        keyboard.update_key(KeyCode::ArrowLeft, true);
        keyboard.update_key(KeyCode::A, false);

        assert!(keyboard.snapshot().left);
    }
}
