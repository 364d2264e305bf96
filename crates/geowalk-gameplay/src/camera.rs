//! Border-based camera follow.
//!
//! The sprite walks freely in the middle of the screen. Once it reaches the
//! margin band along any viewport edge it is held at the band's inner edge
//! and the overflow is handed to the map as a pan instead.

use geowalk_common::Viewport;
use serde::{Deserialize, Serialize};

use crate::player::{Extent, PlayerState};

/// Default margin as a fraction of the viewport size.
pub const DEFAULT_MARGIN_RATIO: f64 = 0.35;

/// A relative camera pan in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanDelta {
    /// Horizontal pan
    pub dx: f64,
    /// Vertical pan
    pub dy: f64,
}

impl PanDelta {
    /// Creates a new pan delta.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Returns true if neither axis pans.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Keeps the player inside the central part of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFollow {
    /// Margin on each side, as a fraction of the viewport dimension
    pub margin_ratio: f64,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            margin_ratio: DEFAULT_MARGIN_RATIO,
        }
    }
}

impl CameraFollow {
    /// Creates a follower with a custom margin ratio.
    #[must_use]
    pub const fn new(margin_ratio: f64) -> Self {
        Self { margin_ratio }
    }

    /// Margin in pixels for each axis.
    #[must_use]
    pub fn margins(&self, viewport: &Viewport) -> (f64, f64) {
        (
            viewport.width * self.margin_ratio,
            viewport.height * self.margin_ratio,
        )
    }

    /// Margins for a sprite of size `display`.
    ///
    /// Each margin is capped at half the viewport minus the sprite size, so a
    /// sprite anchored at the viewport centre always sits in the free zone.
    #[must_use]
    pub fn margins_for(&self, viewport: &Viewport, display: Extent) -> (f64, f64) {
        let (border_x, border_y) = self.margins(viewport);
        (
            border_x.min((viewport.width / 2.0 - display.width).max(0.0)),
            border_y.min((viewport.height / 2.0 - display.height).max(0.0)),
        )
    }

    /// Clamps the player into the free zone and returns the overflow as a pan.
    ///
    /// The far-edge check runs after the near-edge one, so on a viewport
    /// smaller than the sprite the far edge wins.
    pub fn follow(&self, player: &mut PlayerState, viewport: &Viewport) -> PanDelta {
        let display = player.display();
        let (border_x, border_y) = self.margins_for(viewport, display);
        let mut pan = PanDelta::default();

        let right_limit = viewport.width - border_x;
        if player.position.x < border_x {
            pan.dx = player.position.x - border_x;
            player.position.x = border_x;
        }
        if player.position.x + display.width > right_limit {
            pan.dx = player.position.x + display.width - right_limit;
            player.position.x = right_limit - display.width;
        }

        let bottom_limit = viewport.height - border_y;
        if player.position.y < border_y {
            pan.dy = player.position.y - border_y;
            player.position.y = border_y;
        }
        if player.position.y + display.height > bottom_limit {
            pan.dy = player.position.y + display.height - bottom_limit;
            player.position.y = bottom_limit - display.height;
        }

        pan
    }
}
