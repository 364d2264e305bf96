//! Player state for movement and rendering.
//!
//! The sprite is positioned by its top-left corner in screen space. Only a
//! smaller "feet" box inside the sprite collides with obstacles, which lets
//! the head and shoulders overlap buildings drawn behind the character.

use geowalk_common::{ScreenPoint, Viewport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a player.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    /// Sprite or collision dimensions must be positive and finite
    #[error("invalid player dimensions: {reason}")]
    InvalidDimensions {
        /// What was wrong
        reason: String,
    },

    /// Speed must be finite and not negative
    #[error("invalid player speed {speed}")]
    InvalidSpeed {
        /// Configured speed
        speed: f64,
    },

    /// The collision box pokes out of the display box
    #[error("collision box {collision:?} does not fit inside display size {display:?}")]
    CollisionBoxOutOfBounds {
        /// Offending collision box
        collision: CollisionBox,
        /// Display size it must fit in
        display: Extent,
    },
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Extent {
    /// Creates a new extent.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Collision footprint, relative to the sprite's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    /// Horizontal offset from the sprite's left edge
    pub offset_x: f64,
    /// Vertical offset from the sprite's top edge
    pub offset_y: f64,
    /// Footprint width
    pub width: f64,
    /// Footprint height
    pub height: f64,
}

impl CollisionBox {
    /// Creates a collision box from explicit offsets and size.
    #[must_use]
    pub const fn new(offset_x: f64, offset_y: f64, width: f64, height: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            width,
            height,
        }
    }

    /// A box of the given size centred horizontally at the bottom of the
    /// sprite.
    #[must_use]
    pub fn feet(display: Extent, width: f64, height: f64) -> Self {
        Self {
            offset_x: (display.width - width) / 2.0,
            offset_y: display.height - height,
            width,
            height,
        }
    }

    /// Checks that the box lies entirely within a sprite of size `display`.
    #[must_use]
    pub fn fits_within(&self, display: Extent) -> bool {
        self.offset_x >= 0.0
            && self.offset_y >= 0.0
            && self.offset_x + self.width <= display.width
            && self.offset_y + self.height <= display.height
    }
}

/// Movement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

/// Direction the player is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Facing up
    Up,
    /// Facing down (default)
    #[default]
    Down,
    /// Facing left
    Left,
    /// Facing right
    Right,
}

impl Direction {
    /// Row of the sprite sheet holding this direction's frames.
    #[must_use]
    pub const fn sprite_row(self) -> u32 {
        match self {
            Direction::Left => 1,
            Direction::Up | Direction::Down | Direction::Right => 0,
        }
    }

    /// Column where this direction's frame set starts.
    #[must_use]
    pub const fn column_offset(self) -> u32 {
        match self {
            Direction::Left => 1,
            Direction::Up | Direction::Down | Direction::Right => 0,
        }
    }
}

/// Tunable player parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Pixels moved per tick on each held axis
    pub speed: f64,
    /// On-screen sprite width
    pub display_width: f64,
    /// On-screen sprite height
    pub display_height: f64,
    /// Footprint width
    pub collision_width: f64,
    /// Footprint height
    pub collision_height: f64,
    /// Width of one frame in the sprite sheet
    pub frame_width: f64,
    /// Height of one frame in the sprite sheet
    pub frame_height: f64,
    /// Animation frames per second
    pub animation_fps: f64,
    /// Index of the last walk frame
    pub max_frame: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            display_width: 34.1,
            display_height: 51.2,
            collision_width: 28.0,
            collision_height: 16.0,
            frame_width: 341.0,
            frame_height: 512.0,
            animation_fps: 10.0,
            max_frame: 1,
        }
    }
}

impl PlayerConfig {
    /// Display size.
    #[must_use]
    pub fn display(&self) -> Extent {
        Extent::new(self.display_width, self.display_height)
    }

    /// Checks the settings that `PlayerState::new` cannot see.
    pub fn validate(&self) -> Result<(), PlayerError> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(PlayerError::InvalidSpeed { speed: self.speed });
        }
        Ok(())
    }

    /// Feet collision box for this configuration.
    #[must_use]
    pub fn collision_box(&self) -> CollisionBox {
        CollisionBox::feet(self.display(), self.collision_width, self.collision_height)
    }
}

/// Runtime state of the player sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Top-left corner of the sprite in screen space
    pub position: ScreenPoint,
    /// Requested displacement for the current tick
    pub intent: (f64, f64),
    /// Whether movement was requested this tick
    pub moving: bool,
    /// Facing direction, drives the sprite row
    pub facing: Direction,
    display: Extent,
    collision: CollisionBox,
}

impl PlayerState {
    /// Creates a player, checking that the footprint fits inside the sprite.
    pub fn new(
        position: ScreenPoint,
        display: Extent,
        collision: CollisionBox,
    ) -> Result<Self, PlayerError> {
        if !display.is_valid() {
            return Err(PlayerError::InvalidDimensions {
                reason: format!("display size {display:?}"),
            });
        }
        if !Extent::new(collision.width, collision.height).is_valid() {
            return Err(PlayerError::InvalidDimensions {
                reason: format!("collision size {}x{}", collision.width, collision.height),
            });
        }
        if !collision.fits_within(display) {
            return Err(PlayerError::CollisionBoxOutOfBounds { collision, display });
        }

        Ok(Self {
            position,
            intent: (0.0, 0.0),
            moving: false,
            facing: Direction::default(),
            display,
            collision,
        })
    }

    /// Creates a player from a config, centred in the viewport.
    pub fn from_config(config: &PlayerConfig, viewport: Viewport) -> Result<Self, PlayerError> {
        let center = viewport.center();
        Self::new(center, config.display(), config.collision_box())
    }

    /// Sprite size on screen.
    #[must_use]
    pub fn display(&self) -> Extent {
        self.display
    }

    /// Collision footprint.
    #[must_use]
    pub fn collision_box(&self) -> CollisionBox {
        self.collision
    }

    /// Top-left corner of the footprint in screen space.
    #[must_use]
    pub fn collision_origin(&self) -> ScreenPoint {
        self.position
            .offset(self.collision.offset_x, self.collision.offset_y)
    }

    /// The three footprint points that lead movement along `axis`.
    ///
    /// Moving right probes the right edge (top, middle, bottom), moving left
    /// the left edge; moving down probes the bottom edge (left, middle,
    /// right), moving up the top edge. Returns `None` when `delta` is zero.
    #[must_use]
    pub fn leading_edge(&self, axis: Axis, delta: f64) -> Option<[ScreenPoint; 3]> {
        if delta == 0.0 {
            return None;
        }
        let origin = self.collision_origin();
        let (w, h) = (self.collision.width, self.collision.height);

        let points = match axis {
            Axis::X => {
                let x = if delta > 0.0 { origin.x + w } else { origin.x };
                [
                    ScreenPoint::new(x, origin.y),
                    ScreenPoint::new(x, origin.y + h / 2.0),
                    ScreenPoint::new(x, origin.y + h),
                ]
            },
            Axis::Y => {
                let y = if delta > 0.0 { origin.y + h } else { origin.y };
                [
                    ScreenPoint::new(origin.x, y),
                    ScreenPoint::new(origin.x + w / 2.0, y),
                    ScreenPoint::new(origin.x + w, y),
                ]
            },
        };
        Some(points)
    }

    /// Sprite-sheet row for the current facing.
    #[must_use]
    pub fn sprite_row(&self) -> u32 {
        self.facing.sprite_row()
    }

    /// Sprite-sheet column offset for the current facing.
    #[must_use]
    pub fn column_offset(&self) -> u32 {
        self.facing.column_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f64, y: f64) -> PlayerState {
        PlayerState::new(
            ScreenPoint::new(x, y),
            Extent::new(40.0, 60.0),
            CollisionBox::new(5.0, 44.0, 30.0, 16.0),
        )
        .expect("valid player")
    }

    #[test]
    fn test_feet_box_is_bottom_centered() {
        let config = PlayerConfig::default();
        let feet = config.collision_box();

        assert!((feet.offset_x - 3.05).abs() < 1e-9);
        assert!((feet.offset_y - 35.2).abs() < 1e-9);
        assert!(feet.fits_within(config.display()));
    }

    #[test]
    fn test_collision_box_must_fit() {
        let result = PlayerState::new(
            ScreenPoint::new(0.0, 0.0),
            Extent::new(20.0, 20.0),
            CollisionBox::new(5.0, 5.0, 20.0, 10.0),
        );
        assert!(matches!(
            result,
            Err(PlayerError::CollisionBoxOutOfBounds { .. })
        ));

        let negative = PlayerState::new(
            ScreenPoint::new(0.0, 0.0),
            Extent::new(20.0, 20.0),
            CollisionBox::new(-1.0, 0.0, 5.0, 5.0),
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = PlayerState::new(
            ScreenPoint::new(0.0, 0.0),
            Extent::new(0.0, 20.0),
            CollisionBox::new(0.0, 0.0, 0.0, 0.0),
        );
        assert!(matches!(result, Err(PlayerError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_from_config_centers_player() {
        let player = PlayerState::from_config(&PlayerConfig::default(), Viewport::new(1000.0, 800.0))
            .expect("default config is valid");

        assert_eq!(player.position, ScreenPoint::new(500.0, 400.0));
        assert!(!player.moving);
        assert_eq!(player.facing, Direction::Down);
    }

    #[test]
    fn test_leading_edge_x() {
        let player = player_at(100.0, 100.0);

        let right = player.leading_edge(Axis::X, 1.0).expect("moving");
        assert_eq!(right[0], ScreenPoint::new(135.0, 144.0));
        assert_eq!(right[1], ScreenPoint::new(135.0, 152.0));
        assert_eq!(right[2], ScreenPoint::new(135.0, 160.0));

        let left = player.leading_edge(Axis::X, -1.0).expect("moving");
        assert!(left.iter().all(|p| p.x == 105.0));

        assert!(player.leading_edge(Axis::X, 0.0).is_none());
    }

    #[test]
    fn test_leading_edge_y() {
        let player = player_at(100.0, 100.0);

        let down = player.leading_edge(Axis::Y, 1.0).expect("moving");
        assert_eq!(down[0], ScreenPoint::new(105.0, 160.0));
        assert_eq!(down[1], ScreenPoint::new(120.0, 160.0));
        assert_eq!(down[2], ScreenPoint::new(135.0, 160.0));

        let up = player.leading_edge(Axis::Y, -1.0).expect("moving");
        assert!(up.iter().all(|p| p.y == 144.0));
    }

    #[test]
    fn test_direction_sprite_fields() {
        assert_eq!(Direction::Left.sprite_row(), 1);
        assert_eq!(Direction::Left.column_offset(), 1);
        for dir in [Direction::Up, Direction::Down, Direction::Right] {
            assert_eq!(dir.sprite_row(), 0);
            assert_eq!(dir.column_offset(), 0);
        }
    }
}
