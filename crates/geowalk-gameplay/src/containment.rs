//! Point-in-region tests.
//!
//! Two phases: the cached bounding box rejects far-away points cheaply, then
//! an even-odd ray cast over the polygon edges decides the rest. The box is a
//! superset of the polygon, so the first phase never changes the answer.
//!
//! Points exactly on the polygon boundary get whatever the ray cast yields.
//! That result is deterministic but not guaranteed to be inside or outside;
//! for the square `(0,0) (0,2) (2,2) (2,0)` the corner `(0,0)` reports inside
//! because the ray leaving it crosses the far edge at that edge's endpoint.

use geowalk_common::GeoPoint;
use tracing::trace;

use crate::region::{Region, RegionSet};

/// Checks whether `point` lies inside `region`.
#[must_use]
pub fn contains(point: GeoPoint, region: &Region) -> bool {
    if !region.bounding_box().contains(point) {
        return false;
    }
    ray_cast(point, region.vertices())
}

/// Even-odd rule with a ray pointing toward increasing longitude.
fn ray_cast(point: GeoPoint, vertices: &[GeoPoint]) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;

    for (i, vi) in vertices.iter().enumerate() {
        let vj = vertices[j];
        if (vi.lat > point.lat) != (vj.lat > point.lat) {
            // The latitudes differ here, so the division is safe.
            let edge_lng = (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng;
            if point.lng < edge_lng {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Checks a projected point against every region.
///
/// A point that failed to project (`None`) never collides.
#[must_use]
pub fn is_colliding(point: Option<GeoPoint>, regions: &RegionSet) -> bool {
    let Some(point) = point else {
        trace!("Unprojected probe treated as passable");
        return false;
    };
    regions.iter().any(|region| contains(point, region))
}
