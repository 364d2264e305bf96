//! Level definitions.
//!
//! A level names the map position the session starts at and lists the
//! obstacles. Levels are stored as RON.

use geowalk_common::{GeoPoint, LevelError, SchemaVersion};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::player::PlayerConfig;
use crate::region::RegionSet;

/// One obstacle as written in a level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    /// Display name
    pub name: String,
    /// Boundary vertices, not closed
    pub vertices: Vec<GeoPoint>,
}

/// A playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Format version of the file
    #[serde(default)]
    pub version: SchemaVersion,
    /// Level name
    pub name: String,
    /// Map centre at session start
    pub center: GeoPoint,
    /// Map zoom level
    pub zoom: f64,
    /// Obstacles
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
    /// Player overrides for this level
    #[serde(default)]
    pub player: Option<PlayerConfig>,
}

impl LevelDefinition {
    /// The demo level: a single building south-west of the start point.
    #[must_use]
    pub fn demo() -> Self {
        let (south, west) = (37.562_280, 127.191_840);
        let (north, east) = (37.562_862, 127.192_749);
        Self {
            version: SchemaVersion::LEVEL_FORMAT,
            name: "demo".to_string(),
            center: GeoPoint::new(37.563_188, 127.192_642),
            zoom: 21.0,
            obstacles: vec![ObstacleDef {
                name: "building".to_string(),
                vertices: vec![
                    GeoPoint::new(south, west),
                    GeoPoint::new(south, east),
                    GeoPoint::new(north, east),
                    GeoPoint::new(north, west),
                ],
            }],
            player: None,
        }
    }

    /// Parses a level from RON, checking the format version.
    pub fn from_ron(source: &str) -> Result<Self, LevelError> {
        let level: Self = ron::from_str(source).map_err(|e| LevelError::Parse(e.to_string()))?;
        if !SchemaVersion::LEVEL_FORMAT.can_read(&level.version) {
            return Err(LevelError::UnsupportedVersion {
                expected: SchemaVersion::LEVEL_FORMAT.to_string(),
                found: level.version.to_string(),
            });
        }
        if SchemaVersion::LEVEL_FORMAT.is_older_minor_than(&level.version) {
            warn!(
                level = %level.name,
                version = %level.version,
                "Level uses a newer format, unknown fields are ignored"
            );
        }
        Ok(level)
    }

    /// Serializes the level to pretty RON.
    pub fn to_ron(&self) -> Result<String, LevelError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LevelError::Serialize(e.to_string()))
    }

    /// Player settings for this level, falling back to the defaults.
    #[must_use]
    pub fn player_config(&self) -> PlayerConfig {
        self.player.clone().unwrap_or_default()
    }

    /// Builds the obstacle set.
    ///
    /// Invalid obstacles are logged and skipped; the rest of the level loads.
    #[must_use]
    pub fn build_regions(&self) -> RegionSet {
        let mut regions = RegionSet::new();
        for obstacle in &self.obstacles {
            if let Err(e) = regions.add_named_region(obstacle.name.clone(), obstacle.vertices.clone())
            {
                warn!(obstacle = %obstacle.name, "Skipping invalid obstacle: {e}");
            }
        }
        info!(
            level = %self.name,
            regions = regions.len(),
            skipped = self.obstacles.len() - regions.len(),
            "Built collision regions"
        );
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_level_regions() {
        let level = LevelDefinition::demo();
        let regions = level.build_regions();

        assert_eq!(regions.len(), 1);
        let building = regions.iter().next().expect("one region");
        assert_eq!(building.name(), Some("building"));
        assert!(building.contains(GeoPoint::new(37.5625, 127.1922)));
        assert!(!building.contains(level.center));
    }

    #[test]
    fn test_invalid_obstacle_skipped() {
        let mut level = LevelDefinition::demo();
        level.obstacles.push(ObstacleDef {
            name: "sliver".to_string(),
            vertices: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)],
        });
        level.obstacles.push(ObstacleDef {
            name: "triangle".to_string(),
            vertices: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(1.0, 0.0),
            ],
        });

        let regions = level.build_regions();
        let names: Vec<_> = regions.iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, vec!["building", "triangle"]);
    }

    #[test]
    fn test_ron_round_trip() {
        let mut level = LevelDefinition::demo();
        level.player = Some(PlayerConfig {
            speed: 3.0,
            ..PlayerConfig::default()
        });

        let text = level.to_ron().expect("serializes");
        let parsed = LevelDefinition::from_ron(&text).expect("parses");
        assert_eq!(parsed, level);
        assert_eq!(parsed.player_config().speed, 3.0);
    }

    #[test]
    fn test_minimal_ron_uses_defaults() {
        let text = r#"(
            name: "empty",
            center: (lat: 1.0, lng: 2.0),
            zoom: 18.0,
        )"#;

        let level = LevelDefinition::from_ron(text).expect("parses");
        assert_eq!(level.version, SchemaVersion::LEVEL_FORMAT);
        assert!(level.obstacles.is_empty());
        assert_eq!(level.player_config(), PlayerConfig::default());
    }

    #[test]
    fn test_future_major_version_rejected() {
        let text = r#"(
            version: (major: 2, minor: 0, patch: 0),
            name: "future",
            center: (lat: 0.0, lng: 0.0),
            zoom: 18.0,
        )"#;

        let err = LevelDefinition::from_ron(text).expect_err("unsupported");
        assert!(matches!(err, LevelError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_newer_minor_version_accepted() {
        let text = r#"(
            version: (major: 1, minor: 4, patch: 0),
            name: "newer",
            center: (lat: 0.0, lng: 0.0),
            zoom: 18.0,
        )"#;

        let level = LevelDefinition::from_ron(text).expect("same major");
        assert_eq!(level.version, SchemaVersion::new(1, 4, 0));
    }

    #[test]
    fn test_malformed_ron() {
        let err = LevelDefinition::from_ron("(name: 3)").expect_err("bad input");
        assert!(matches!(err, LevelError::Parse(_)));
    }
}
