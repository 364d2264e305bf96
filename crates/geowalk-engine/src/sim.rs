//! Headless simulation.
//!
//! Replays an [`InputScript`] against a level without a window, collecting a
//! summary the runner prints as JSON.

use geowalk_common::{GeoPoint, ScreenPoint};
use geowalk_gameplay::{
    Direction, GameSession, LevelDefinition, MercatorViewport, PanDelta, PlayerError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::script::InputScript;

/// Summary of one scripted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Level name
    pub level: String,
    /// Ticks executed
    pub ticks: u64,
    /// True if the script was cut short by `max_ticks`
    pub truncated: bool,
    /// Ticks on which the player moved
    pub moving_ticks: u64,
    /// Ticks on which horizontal movement was refused
    pub blocked_x_ticks: u64,
    /// Ticks on which vertical movement was refused
    pub blocked_y_ticks: u64,
    /// Ticks that panned the map
    pub pan_ticks: u64,
    /// Sum of all pans
    pub total_pan: PanDelta,
    /// Sprite position after the last tick
    pub final_position: ScreenPoint,
    /// Facing after the last tick
    pub facing: Direction,
    /// Walk-cycle frame after the last tick
    pub frame: u32,
    /// Map centre after the last tick
    pub map_center: GeoPoint,
}

/// A level loaded into a Web-Mercator session.
#[derive(Debug)]
pub struct Simulation {
    level: String,
    session: GameSession<MercatorViewport>,
    tick_ms: f64,
    max_ticks: u64,
}

impl Simulation {
    /// Builds the session for `level` using the viewport and camera from
    /// `config`.
    pub fn new(config: &EngineConfig, level: &LevelDefinition) -> Result<Self, PlayerError> {
        let viewport = config.viewport();
        let map = MercatorViewport::new(level.center, level.zoom, viewport);
        let session = GameSession::new(&level.player_config(), level.build_regions(), map, viewport)?
            .with_camera(config.camera());

        info!(
            level = %level.name,
            width = viewport.width,
            height = viewport.height,
            "Simulation ready"
        );

        Ok(Self {
            level: level.name.clone(),
            session,
            tick_ms: config.tick_ms(),
            max_ticks: config.max_ticks,
        })
    }

    /// The underlying session.
    #[must_use]
    pub fn session(&self) -> &GameSession<MercatorViewport> {
        &self.session
    }

    /// Replays `script` and summarises the run.
    pub fn run(&mut self, script: &InputScript) -> SimulationReport {
        let requested = script.total_ticks();
        let truncated = requested > self.max_ticks;
        if truncated {
            warn!(
                requested,
                max_ticks = self.max_ticks,
                "Input script exceeds tick limit, truncating"
            );
        }

        let mut report = SimulationReport {
            level: self.level.clone(),
            ticks: 0,
            truncated,
            moving_ticks: 0,
            blocked_x_ticks: 0,
            blocked_y_ticks: 0,
            pan_ticks: 0,
            total_pan: PanDelta::default(),
            final_position: self.session.player().position,
            facing: self.session.player().facing,
            frame: 0,
            map_center: self.session.projection().center(),
        };

        for input in script.inputs().take(usize::try_from(self.max_ticks).unwrap_or(usize::MAX)) {
            let tick = self.session.tick(input, self.tick_ms);
            let motion = tick.motion;

            report.ticks += 1;
            report.frame = tick.frame;
            report.moving_ticks += u64::from(motion.moving);
            report.blocked_x_ticks += u64::from(motion.blocked_x);
            report.blocked_y_ticks += u64::from(motion.blocked_y);
            if let Some(pan) = motion.pan {
                report.pan_ticks += 1;
                report.total_pan.dx += pan.dx;
                report.total_pan.dy += pan.dy;
            }
        }

        let player = self.session.player();
        report.final_position = player.position;
        report.facing = player.facing;
        report.map_center = self.session.projection().center();

        debug!(ticks = report.ticks, "Script finished");
        report
    }
}
