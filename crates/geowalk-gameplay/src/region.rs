//! Collision region store.
//!
//! Regions are polygonal obstacles in geographic coordinates. Each one caches
//! its axis-aligned bounding box at construction so the containment test can
//! reject most points without walking the polygon edges.

use geowalk_common::{GeoPoint, RegionError, RegionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::containment;

/// Minimum number of vertices for a polygon.
pub const MIN_VERTICES: usize = 3;

/// Axis-aligned bounding box in latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude
    pub min_lat: f64,
    /// Maximum latitude
    pub max_lat: f64,
    /// Minimum longitude
    pub min_lng: f64,
    /// Maximum longitude
    pub max_lng: f64,
}

impl BoundingBox {
    /// Computes the bounding box of a vertex list.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_vertices(vertices: &[GeoPoint]) -> Option<Self> {
        let first = vertices.first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };

        Some(vertices[1..].iter().fold(init, |b, v| Self {
            min_lat: b.min_lat.min(v.lat),
            max_lat: b.max_lat.max(v.lat),
            min_lng: b.min_lng.min(v.lng),
            max_lng: b.max_lng.max(v.lng),
        }))
    }

    /// Checks if a point lies inside the box. Edges count as inside.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Returns the centre of the box.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// A polygonal obstacle.
///
/// Immutable once built: the vertex list and the cached bounding box always
/// agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    name: Option<String>,
    vertices: Vec<GeoPoint>,
    bounds: BoundingBox,
}

impl Region {
    /// Builds a region from its boundary vertices.
    ///
    /// The polygon is closed implicitly; do not repeat the first vertex.
    pub fn new(id: RegionId, vertices: Vec<GeoPoint>) -> Result<Self, RegionError> {
        if vertices.len() < MIN_VERTICES {
            return Err(RegionError::TooFewVertices {
                count: vertices.len(),
            });
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(RegionError::NonFiniteVertex { index });
        }

        let bounds = BoundingBox::from_vertices(&vertices)
            .ok_or(RegionError::TooFewVertices { count: 0 })?;

        Ok(Self {
            id,
            name: None,
            vertices,
            bounds,
        })
    }

    /// Builds a rectangular region from two opposite corners.
    pub fn from_bounds(id: RegionId, a: GeoPoint, b: GeoPoint) -> Result<Self, RegionError> {
        let (south, north) = (a.lat.min(b.lat), a.lat.max(b.lat));
        let (west, east) = (a.lng.min(b.lng), a.lng.max(b.lng));
        Self::new(
            id,
            vec![
                GeoPoint::new(south, west),
                GeoPoint::new(south, east),
                GeoPoint::new(north, east),
                GeoPoint::new(north, west),
            ],
        )
    }

    /// Attaches a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Region identifier.
    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Boundary vertices in order.
    #[must_use]
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Cached bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Checks if a point is inside this region.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        containment::contains(point, self)
    }
}

/// The obstacles of a level.
///
/// Filled at world setup, then only queried.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
    next_id: RegionId,
}

impl RegionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a vertex list and stores it as a new region.
    ///
    /// On error the set is left unchanged.
    pub fn add_region(&mut self, vertices: Vec<GeoPoint>) -> Result<&Region, RegionError> {
        let region = Region::new(self.next_id, vertices)?;
        Ok(self.push(region))
    }

    /// Same as [`RegionSet::add_region`] with a display name.
    pub fn add_named_region(
        &mut self,
        name: impl Into<String>,
        vertices: Vec<GeoPoint>,
    ) -> Result<&Region, RegionError> {
        let region = Region::new(self.next_id, vertices)?.with_name(name);
        Ok(self.push(region))
    }

    fn push(&mut self, region: Region) -> &Region {
        debug!(
            id = %region.id(),
            vertices = region.vertices().len(),
            "Added collision region"
        );
        self.next_id = self.next_id.next();
        self.regions.push(region);
        &self.regions[self.regions.len() - 1]
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Iterates over all regions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if the set has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns the first region containing the point.
    #[must_use]
    pub fn first_containing(&self, point: GeoPoint) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(2.0, 0.0),
        ]
    }

    #[test]
    fn test_add_region_caches_bounds() {
        let mut set = RegionSet::new();
        let region = set.add_region(square()).expect("valid square");

        let bounds = region.bounding_box();
        assert_eq!(bounds.min_lat, 0.0);
        assert_eq!(bounds.max_lat, 2.0);
        assert_eq!(bounds.min_lng, 0.0);
        assert_eq!(bounds.max_lng, 2.0);
        assert_eq!(bounds.center(), GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_too_few_vertices_rejected() {
        let mut set = RegionSet::new();
        let result = set.add_region(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]);

        assert_eq!(result.err(), Some(RegionError::TooFewVertices { count: 2 }));
        assert!(set.is_empty());
    }

    #[test]
    fn test_non_finite_vertex_rejected() {
        let mut vertices = square();
        vertices[2] = GeoPoint::new(f64::NAN, 1.0);

        let result = Region::new(RegionId::new(7), vertices);
        assert_eq!(result.err(), Some(RegionError::NonFiniteVertex { index: 2 }));
    }

    #[test]
    fn test_failed_insert_keeps_existing_regions() {
        let mut set = RegionSet::new();
        set.add_region(square()).expect("valid square");
        assert!(set.add_region(Vec::new()).is_err());

        let second = set.add_region(square()).expect("valid square");
        assert_eq!(second.id(), RegionId::new(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut set = RegionSet::new();
        set.add_named_region("first", square()).expect("valid");
        set.add_named_region("second", square()).expect("valid");

        let names: Vec<_> = set.iter().filter_map(Region::name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(set.get(RegionId::new(1)).and_then(Region::name), Some("second"));
        assert!(set.get(RegionId::new(5)).is_none());
    }

    #[test]
    fn test_from_bounds_normalizes_corners() {
        let region = Region::from_bounds(
            RegionId::new(0),
            GeoPoint::new(37.562862, 127.192749),
            GeoPoint::new(37.562280, 127.191840),
        )
        .expect("valid rectangle");

        let bounds = region.bounding_box();
        assert_eq!(bounds.min_lat, 37.562280);
        assert_eq!(bounds.max_lng, 127.192749);
        assert_eq!(region.vertices().len(), 4);
        assert!(region.contains(bounds.center()));
    }

    #[test]
    fn test_first_containing() {
        let mut set = RegionSet::new();
        set.add_named_region("a", square()).expect("valid");
        let far = square()
            .into_iter()
            .map(|p| GeoPoint::new(p.lat + 10.0, p.lng + 10.0))
            .collect();
        set.add_named_region("b", far).expect("valid");

        let hit = set.first_containing(GeoPoint::new(11.0, 11.0));
        assert_eq!(hit.and_then(Region::name), Some("b"));
        assert!(set.first_containing(GeoPoint::new(5.0, 5.0)).is_none());
    }

    fn polygon_strategy() -> impl Strategy<Value = Vec<GeoPoint>> {
        prop::collection::vec((-80.0f64..80.0, -170.0f64..170.0), 3..12)
            .prop_map(|pts| pts.into_iter().map(|(lat, lng)| GeoPoint::new(lat, lng)).collect())
    }

    proptest! {
        #[test]
        fn prop_bounds_match_vertices(vertices in polygon_strategy()) {
            let region = Region::new(RegionId::new(0), vertices.clone()).expect("finite polygon");
            let bounds = region.bounding_box();

            let min_lat = vertices.iter().map(|v| v.lat).fold(f64::INFINITY, f64::min);
            let max_lat = vertices.iter().map(|v| v.lat).fold(f64::NEG_INFINITY, f64::max);
            let min_lng = vertices.iter().map(|v| v.lng).fold(f64::INFINITY, f64::min);
            let max_lng = vertices.iter().map(|v| v.lng).fold(f64::NEG_INFINITY, f64::max);

            prop_assert_eq!(bounds.min_lat, min_lat);
            prop_assert_eq!(bounds.max_lat, max_lat);
            prop_assert_eq!(bounds.min_lng, min_lng);
            prop_assert_eq!(bounds.max_lng, max_lng);
            prop_assert!(bounds.min_lat <= bounds.max_lat);
            prop_assert!(bounds.min_lng <= bounds.max_lng);
        }
    }
}
