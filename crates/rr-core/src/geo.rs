//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Cluster means and buffer
//! geometry are computed directly on these values, so the extra precision
//! over `f32` is kept end to end.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Mean Earth radius in kilometres, as used for metre → radian conversion of
/// density-clustering radii.
pub const EARTH_RADIUS_KM: f64 = 6_371.0088;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        EARTH_RADIUS_M * self.central_angle(other)
    }

    /// Great-circle angle between two points, in radians.
    pub fn central_angle(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// Euclidean (chord) distance between two such vectors is strictly
    /// monotone in great-circle distance, so an R-tree over them answers
    /// exact great-circle nearest-neighbour and radius queries.
    pub fn unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Arithmetic midpoint of the two coordinates.  Adequate at city scale.
    #[inline]
    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new((self.lat + other.lat) * 0.5, (self.lon + other.lon) * 0.5)
    }
}

/// Squared chord length on the unit sphere for a great-circle angle.
#[inline]
pub fn chord_2(angle_rad: f64) -> f64 {
    let c = 2.0 * (angle_rad * 0.5).sin();
    c * c
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// `(lat, lon)` tuple, the order used throughout the request layer.
    fn from((lat, lon): (f64, f64)) -> Self {
        GeoPoint::new(lat, lon)
    }
}
