//! # Geowalk Gameplay
//!
//! Movement core for a sprite walking over a slippy map.
//!
//! This crate provides:
//! - Collision regions (polygons in lat/lng with cached bounding boxes)
//! - Point-in-region tests
//! - The projection seam between screen pixels and geographic coordinates
//! - Player state, directional input and the walk-cycle animator
//! - The motion resolver (axis-separated sliding plus camera follow)
//! - Level definitions and the game session that ties it all together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod animation;
pub mod camera;
pub mod containment;
pub mod input;
pub mod level;
pub mod motion;
pub mod player;
pub mod projection;
pub mod region;
pub mod session;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::animation::*;
    pub use crate::camera::*;
    pub use crate::containment::*;
    pub use crate::input::*;
    pub use crate::level::*;
    pub use crate::motion::*;
    pub use crate::player::*;
    pub use crate::projection::*;
    pub use crate::region::*;
    pub use crate::session::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use geowalk_common::{GeoPoint, Viewport};

    #[test]
    fn test_square_contract() {
        let mut regions = RegionSet::new();
        let square = regions
            .add_region(vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 2.0),
                GeoPoint::new(2.0, 2.0),
                GeoPoint::new(2.0, 0.0),
            ])
            .expect("valid square");

        assert!(contains(GeoPoint::new(1.0, 1.0), square));
        assert!(!contains(GeoPoint::new(3.0, 3.0), square));
        assert!(!is_colliding(None, &regions));
    }

    #[test]
    fn test_demo_session_starts_clear_of_building() {
        let level = LevelDefinition::demo();
        let viewport = Viewport::new(1280.0, 720.0);
        let map = MercatorViewport::new(level.center, level.zoom, viewport);
        let mut session = GameSession::new(
            &level.player_config(),
            level.build_regions(),
            map,
            viewport,
        )
        .expect("demo config is valid");

        let report = session.tick(InputSnapshot::from_wasd("d"), 16.0);
        assert!(!report.motion.blocked_x);
    }
}
