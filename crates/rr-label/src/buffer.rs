//! Route buffers and a local metric projection.
//!
//! The buffer is built in degrees, the unit the feature provider speaks.
//! Areas and lengths are measured after projecting onto a local
//! equirectangular plane in metres, which is accurate to well under a
//! percent across a city-sized request.  Both steps take the same
//! metres-per-degree scale, so a buffer of `r / m` degrees projects to a
//! half-width of exactly `r` metres north–south.

use geo::{Buffer, Coord, LineString, MapCoords, MultiPolygon, Point};

use rr_core::GeoPoint;

/// The route as a `geo` line (`x = lon`, `y = lat`).
pub fn route_line(coords: &[GeoPoint]) -> LineString<f64> {
    coords.iter().map(|p| Coord { x: p.lon, y: p.lat }).collect()
}

/// Buffer polygon of `radius_deg` around the route.
///
/// A route that never leaves its first coordinate is buffered as a point.
/// Returns `None` for an empty route.
pub fn route_buffer(coords: &[GeoPoint], radius_deg: f64) -> Option<MultiPolygon<f64>> {
    let first = coords.first()?;
    if coords.iter().all(|p| p == first) {
        return Some(Point::new(first.lon, first.lat).buffer(radius_deg));
    }
    Some(route_line(coords).buffer(radius_deg))
}

// ── LocalProjection ───────────────────────────────────────────────────────────

/// Equirectangular projection around an origin, in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalProjection {
    pub origin:         GeoPoint,
    pub m_per_deg_lon:  f64,
    pub m_per_deg_lat:  f64,
}

impl LocalProjection {
    /// `meters_per_degree` is the latitude scale; longitude shrinks by
    /// `cos(origin.lat)`.
    pub fn new(origin: GeoPoint, meters_per_degree: f64) -> Self {
        Self {
            origin,
            m_per_deg_lon: meters_per_degree * origin.lat.to_radians().cos(),
            m_per_deg_lat: meters_per_degree,
        }
    }

    #[inline]
    pub fn project(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (c.x - self.origin.lon) * self.m_per_deg_lon,
            y: (c.y - self.origin.lat) * self.m_per_deg_lat,
        }
    }

    /// Project any `geo` geometry from degrees to metres.
    pub fn apply<G>(&self, geometry: &G) -> <G as MapCoords<f64, f64>>::Output
    where
        G: MapCoords<f64, f64>,
    {
        let proj = *self;
        geometry.map_coords(move |c| proj.project(c))
    }
}
