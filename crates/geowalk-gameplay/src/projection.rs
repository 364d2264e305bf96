//! Projection seam between screen pixels and geographic coordinates.
//!
//! The map backend owns the camera. Gameplay code only asks it two things:
//! where a screen pixel lands on the globe, and to pan by a pixel delta.
//! [`LinearProjection`] is a deterministic stand-in for tests and tooling;
//! [`MercatorViewport`] models a Web-Mercator tile map camera.

use geowalk_common::{GeoPoint, ScreenPoint, Viewport};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::trace;

/// Size of one map tile in pixels at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web-Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Screen-to-globe conversion and relative camera panning.
pub trait GeoProjection {
    /// Converts a screen point to a geographic coordinate.
    ///
    /// Returns `None` when the point cannot be projected, e.g. because it
    /// falls outside the mappable viewport.
    fn screen_to_geo(&self, point: ScreenPoint) -> Option<GeoPoint>;

    /// Pans the camera by a pixel delta.
    fn pan_by(&mut self, dx: f64, dy: f64);
}

/// Wraps a longitude into `[-180, 180)`.
fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

// ============================================================================
// Linear projection
// ============================================================================

/// Flat projection: pixel `(x, y)` maps to `GeoPoint(y * scale, x * scale)`.
///
/// Panning shifts the mapping by the accumulated pixel offset and every pan
/// request is recorded, so tests can assert on what the camera was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProjection {
    scale: f64,
    offset: (f64, f64),
    bounds: Option<Viewport>,
    pans: Vec<(f64, f64)>,
}

impl Default for LinearProjection {
    fn default() -> Self {
        Self {
            scale: 1.0 / 1000.0,
            offset: (0.0, 0.0),
            bounds: None,
            pans: Vec::new(),
        }
    }
}

impl LinearProjection {
    /// Creates a projection with 1000 pixels per degree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom degrees-per-pixel scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Refuses to project points outside the viewport.
    #[must_use]
    pub fn with_bounds(mut self, viewport: Viewport) -> Self {
        self.bounds = Some(viewport);
        self
    }

    /// Pan requests received so far, in order.
    #[must_use]
    pub fn pans(&self) -> &[(f64, f64)] {
        &self.pans
    }

    /// Sum of all pan requests.
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Inverse mapping, ignoring bounds.
    #[must_use]
    pub fn geo_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        ScreenPoint::new(
            point.lng / self.scale - self.offset.0,
            point.lat / self.scale - self.offset.1,
        )
    }
}

impl GeoProjection for LinearProjection {
    fn screen_to_geo(&self, point: ScreenPoint) -> Option<GeoPoint> {
        if let Some(bounds) = self.bounds {
            if !bounds.contains(point) {
                return None;
            }
        }
        Some(GeoPoint::new(
            (point.y + self.offset.1) * self.scale,
            (point.x + self.offset.0) * self.scale,
        ))
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
        self.pans.push((dx, dy));
    }
}

// ============================================================================
// Web-Mercator viewport
// ============================================================================

/// A Web-Mercator map camera centred on a geographic point.
///
/// Screen origin is the top-left corner of the viewport. Points outside the
/// viewport are not projected, matching a canvas laid exactly over the map
/// container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MercatorViewport {
    center: GeoPoint,
    zoom: f64,
    viewport: Viewport,
}

impl MercatorViewport {
    /// Creates a camera looking at `center` at the given zoom level.
    #[must_use]
    pub fn new(center: GeoPoint, zoom: f64, viewport: Viewport) -> Self {
        Self {
            center,
            zoom,
            viewport,
        }
    }

    /// Current map centre.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Width of the whole world in pixels at the current zoom.
    #[must_use]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Projects a geographic point to world pixel coordinates.
    #[must_use]
    pub fn project(&self, point: GeoPoint) -> (f64, f64) {
        let size = self.world_size();
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (point.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    /// Converts world pixel coordinates back to a geographic point.
    #[must_use]
    pub fn unproject(&self, x: f64, y: f64) -> GeoPoint {
        let size = self.world_size();
        let lng = x / size * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat, lng)
    }

    /// Places a geographic point on the screen.
    ///
    /// The result may lie outside the viewport.
    #[must_use]
    pub fn geo_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        let (cx, cy) = self.project(self.center);
        let (x, y) = self.project(point);
        ScreenPoint::new(
            x - cx + self.viewport.width / 2.0,
            y - cy + self.viewport.height / 2.0,
        )
    }
}

impl GeoProjection for MercatorViewport {
    fn screen_to_geo(&self, point: ScreenPoint) -> Option<GeoPoint> {
        if !self.viewport.contains(point) {
            trace!(x = point.x, y = point.y, "Screen point outside viewport");
            return None;
        }
        let (cx, cy) = self.project(self.center);
        let x = cx + point.x - self.viewport.width / 2.0;
        let y = cy + point.y - self.viewport.height / 2.0;
        Some(self.unproject(x, y))
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.project(self.center);
        let size = self.world_size();
        let center = self.unproject(cx + dx, (cy + dy).clamp(0.0, size));
        self.center = GeoPoint::new(center.lat, wrap_longitude(center.lng));
        trace!(dx, dy, center = %self.center, "Map panned");
    }
}
