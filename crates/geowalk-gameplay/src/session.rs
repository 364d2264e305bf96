//! Game session.
//!
//! A session owns everything one running game needs: the player, the level's
//! obstacles, the map projection and the per-tick systems. The game loop
//! samples input, calls [`GameSession::tick`], then reads the state back out
//! for drawing.

use geowalk_common::Viewport;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{SourceRect, SpriteAnimator};
use crate::camera::CameraFollow;
use crate::input::InputSnapshot;
use crate::motion::{MotionOutcome, MotionResolver};
use crate::player::{PlayerConfig, PlayerError, PlayerState};
use crate::projection::GeoProjection;
use crate::region::RegionSet;

/// Per-tick summary for the render step and for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick counter after this tick
    pub tick: u64,
    /// Resolver outcome
    pub motion: MotionOutcome,
    /// Walk-cycle frame after this tick
    pub frame: u32,
}

/// A running game.
#[derive(Debug)]
pub struct GameSession<P: GeoProjection> {
    player: PlayerState,
    regions: RegionSet,
    projection: P,
    resolver: MotionResolver,
    animator: SpriteAnimator,
    viewport: Viewport,
    ticks: u64,
}

impl<P: GeoProjection> GameSession<P> {
    /// Starts a session with the player centred in the viewport.
    ///
    /// Fails if the speed is negative or not finite, or the collision box
    /// does not fit the sprite.
    pub fn new(
        config: &PlayerConfig,
        regions: RegionSet,
        projection: P,
        viewport: Viewport,
    ) -> Result<Self, PlayerError> {
        config.validate()?;
        let player = PlayerState::from_config(config, viewport)?;
        Ok(Self {
            player,
            regions,
            projection,
            resolver: MotionResolver::new(config.speed),
            animator: SpriteAnimator::from_config(config),
            viewport,
            ticks: 0,
        })
    }

    /// Replaces the camera follow policy.
    #[must_use]
    pub fn with_camera(mut self, camera: CameraFollow) -> Self {
        self.resolver = self.resolver.with_camera(camera);
        self
    }

    /// Advances the game by one frame.
    pub fn tick(&mut self, input: InputSnapshot, dt_ms: f64) -> TickReport {
        let motion = self.resolver.resolve(
            &mut self.player,
            input,
            &self.regions,
            &mut self.projection,
            &self.viewport,
        );
        self.animator.advance(dt_ms, self.player.moving);
        self.ticks += 1;

        if motion.blocked_x || motion.blocked_y {
            debug!(tick = self.ticks, "Player blocked by obstacle");
        }

        TickReport {
            tick: self.ticks,
            motion,
            frame: self.animator.frame(),
        }
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The obstacles.
    #[must_use]
    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// The map projection.
    #[must_use]
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sprite-sheet crop for the current frame.
    #[must_use]
    pub fn sprite_source(&self) -> SourceRect {
        self.animator.source_rect(self.player.facing)
    }

    /// Resizes the viewport, e.g. after a window resize.
    ///
    /// The player keeps its screen position; the next tick re-applies the
    /// camera margins.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::LinearProjection;
    use geowalk_common::ScreenPoint;

    fn session() -> GameSession<LinearProjection> {
        GameSession::new(
            &PlayerConfig::default(),
            RegionSet::new(),
            LinearProjection::new(),
            Viewport::new(1000.0, 1000.0),
        )
        .expect("default config is valid")
    }

    fn session_with_speed(speed: f64) -> Result<GameSession<LinearProjection>, PlayerError> {
        let config = PlayerConfig {
            speed,
            ..PlayerConfig::default()
        };
        GameSession::new(
            &config,
            RegionSet::new(),
            LinearProjection::new(),
            Viewport::new(1000.0, 1000.0),
        )
    }

    #[test]
    fn test_nan_speed_rejected() {
        let err = session_with_speed(f64::NAN).expect_err("NaN speed");
        assert!(matches!(err, PlayerError::InvalidSpeed { speed } if speed.is_nan()));
    }

    #[test]
    fn test_infinite_speed_rejected() {
        let err = session_with_speed(f64::INFINITY).expect_err("infinite speed");
        assert_eq!(err, PlayerError::InvalidSpeed { speed: f64::INFINITY });
    }

    #[test]
    fn test_negative_speed_rejected() {
        let err = session_with_speed(-2.0).expect_err("negative speed");
        assert_eq!(err, PlayerError::InvalidSpeed { speed: -2.0 });
    }

    #[test]
    fn test_zero_speed_stands_still() {
        let mut session = session_with_speed(0.0).expect("zero speed is allowed");
        let start = session.player().position;

        let report = session.tick(InputSnapshot::from_wasd("d"), 16.0);

        assert!(!report.motion.moving);
        assert_eq!(session.player().position, start);
    }

    #[test]
    fn test_tick_moves_and_animates() {
        let mut session = session();
        let start = session.player().position;

        let report = session.tick(InputSnapshot::from_wasd("d"), 16.0);

        assert_eq!(report.tick, 1);
        assert!(report.motion.moving);
        assert_eq!(session.player().position, start.offset(1.0, 0.0));
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_idle_tick_keeps_frame_zero() {
        let mut session = session();
        for _ in 0..10 {
            session.tick(InputSnapshot::from_wasd("w"), 50.0);
        }
        let report = session.tick(InputSnapshot::NONE, 50.0);

        assert_eq!(report.frame, 0);
        assert!(!session.player().moving);
        assert_eq!(session.sprite_source().x, 0.0);
    }

    #[test]
    fn test_long_walk_pans_camera() {
        let mut session = session();
        for _ in 0..300 {
            session.tick(InputSnapshot::from_wasd("d"), 16.0);
        }

        let player = session.player();
        let right_limit = 650.0 - player.display().width;
        assert!((player.position.x - right_limit).abs() < 1e-6);
        assert!(!session.projection().pans().is_empty());
    }

    #[test]
    fn test_custom_camera_margin() {
        let mut session = session().with_camera(CameraFollow::new(0.0));
        session.set_viewport(Viewport::new(1000.0, 1000.0));
        session.tick(InputSnapshot::from_wasd("a"), 16.0);

        assert_eq!(session.player().position, ScreenPoint::new(499.0, 500.0));
        assert!(session.projection().pans().is_empty());
    }
}
