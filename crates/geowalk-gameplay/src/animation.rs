//! Walk-cycle frame timing.

use serde::{Deserialize, Serialize};

use crate::player::{Direction, PlayerConfig};

/// Crop rectangle inside the sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    /// Left edge in sheet pixels
    pub x: f64,
    /// Top edge in sheet pixels
    pub y: f64,
    /// Width in sheet pixels
    pub width: f64,
    /// Height in sheet pixels
    pub height: f64,
}

/// Advances the walk cycle while the player moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimator {
    frame: u32,
    max_frame: u32,
    timer_ms: f64,
    interval_ms: f64,
    frame_width: f64,
    frame_height: f64,
}

impl Default for SpriteAnimator {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default())
    }
}

impl SpriteAnimator {
    /// Creates an animator for the sheet described by `config`.
    #[must_use]
    pub fn from_config(config: &PlayerConfig) -> Self {
        let fps = if config.animation_fps > 0.0 {
            config.animation_fps
        } else {
            PlayerConfig::default().animation_fps
        };
        Self {
            frame: 0,
            max_frame: config.max_frame,
            timer_ms: 0.0,
            interval_ms: 1000.0 / fps,
            frame_width: config.frame_width,
            frame_height: config.frame_height,
        }
    }

    /// Current frame within the walk cycle.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Steps the timer by `dt_ms`.
    ///
    /// A frame change happens on the first step after the timer exceeds the
    /// interval; that step resets the timer without accumulating. Standing
    /// still shows frame 0.
    pub fn advance(&mut self, dt_ms: f64, moving: bool) {
        if !moving {
            self.frame = 0;
            return;
        }
        if self.timer_ms > self.interval_ms {
            self.frame = if self.frame < self.max_frame {
                self.frame + 1
            } else {
                0
            };
            self.timer_ms = 0.0;
        } else {
            self.timer_ms += dt_ms;
        }
    }

    /// Sheet region to draw for the current frame and facing.
    #[must_use]
    pub fn source_rect(&self, facing: Direction) -> SourceRect {
        let column = facing.column_offset() + self.frame;
        SourceRect {
            x: f64::from(column) * self.frame_width,
            y: f64::from(facing.sprite_row()) * self.frame_height,
            width: self.frame_width,
            height: self.frame_height,
        }
    }
}
