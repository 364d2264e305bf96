//! Motion resolution with axis-separated sliding and camera follow.
//!
//! Each tick the requested displacement is applied one axis at a time. After
//! each axis the leading edge of the player's footprint is projected onto the
//! map and tested against the obstacles; a hit rolls back that axis only, so
//! walking diagonally into a wall slides along it. Whatever movement pushes
//! the sprite into the screen margin is then converted into a map pan.

use geowalk_common::Viewport;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::camera::{CameraFollow, PanDelta};
use crate::containment::is_colliding;
use crate::input::InputSnapshot;
use crate::player::{Axis, PlayerState};
use crate::projection::GeoProjection;
use crate::region::RegionSet;

/// What happened during one resolver step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionOutcome {
    /// Movement was requested this tick
    pub moving: bool,
    /// Horizontal movement was rolled back by an obstacle
    pub blocked_x: bool,
    /// Vertical movement was rolled back by an obstacle
    pub blocked_y: bool,
    /// Pan issued to the projection, if any
    pub pan: Option<PanDelta>,
}

impl MotionOutcome {
    /// Outcome of a tick with no directional input.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            moving: false,
            blocked_x: false,
            blocked_y: false,
            pan: None,
        }
    }
}

/// Resolves player movement against collision regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionResolver {
    /// Pixels per tick on each held axis
    pub speed: f64,
    /// Camera follow policy
    pub camera: CameraFollow,
}

impl Default for MotionResolver {
    fn default() -> Self {
        Self {
            speed: 1.0,
            camera: CameraFollow::default(),
        }
    }
}

impl MotionResolver {
    /// Creates a resolver with the given speed and the default camera margin.
    #[must_use]
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    /// Uses a custom camera follow policy.
    #[must_use]
    pub fn with_camera(mut self, camera: CameraFollow) -> Self {
        self.camera = camera;
        self
    }

    /// Runs one tick of movement.
    ///
    /// Mutates the player's position, `intent`, `moving` and `facing`, and
    /// issues at most one pan to `projection`.
    pub fn resolve<P: GeoProjection + ?Sized>(
        &self,
        player: &mut PlayerState,
        input: InputSnapshot,
        regions: &RegionSet,
        projection: &mut P,
        viewport: &Viewport,
    ) -> MotionOutcome {
        let (move_x, move_y) = input.move_vector(self.speed);
        player.intent = (move_x, move_y);
        if move_x == 0.0 && move_y == 0.0 {
            player.moving = false;
            return MotionOutcome::idle();
        }
        player.moving = true;

        player.position.x += move_x;
        let blocked_x = Self::edge_blocked(player, Axis::X, move_x, regions, &*projection);
        if blocked_x {
            player.position.x -= move_x;
        }

        player.position.y += move_y;
        let blocked_y = Self::edge_blocked(player, Axis::Y, move_y, regions, &*projection);
        if blocked_y {
            player.position.y -= move_y;
        }

        if let Some(facing) = input.facing() {
            player.facing = facing;
        }

        let pan = self.camera.follow(player, viewport);
        let pan = if pan.is_zero() {
            None
        } else {
            projection.pan_by(pan.dx, pan.dy);
            Some(pan)
        };

        debug!(
            x = player.position.x,
            y = player.position.y,
            blocked_x,
            blocked_y,
            panned = pan.is_some(),
            "Resolved player motion"
        );

        MotionOutcome {
            moving: true,
            blocked_x,
            blocked_y,
            pan,
        }
    }

    /// Tests the footprint's leading edge along `axis` at the current position.
    fn edge_blocked<P: GeoProjection + ?Sized>(
        player: &PlayerState,
        axis: Axis,
        delta: f64,
        regions: &RegionSet,
        projection: &P,
    ) -> bool {
        let Some(probes) = player.leading_edge(axis, delta) else {
            return false;
        };

        probes.iter().any(|&probe| {
            let hit = is_colliding(projection.screen_to_geo(probe), regions);
            if hit {
                trace!(?axis, x = probe.x, y = probe.y, "Probe hit obstacle");
            }
            hit
        })
    }
}
