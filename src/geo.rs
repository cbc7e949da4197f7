use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A ring vertex in GeoJSON order: `[lon, lat]` in degrees.
pub type Position = [f64; 2];

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar angular distance in degrees (no great-circle correction)
    #[inline(always)]
    pub fn planar_distance(&self, lat: f64, lon: f64) -> f64 {
        ((lat - self.lat).powi(2) + (lon - self.lon).powi(2)).sqrt()
    }
}

/// Project lat/lon (degrees) onto a sphere of the given radius.
///
/// Longitude is negated so that increasing longitude sweeps towards the
/// viewer's right for a camera looking down -Z with +Y up.
#[inline(always)]
pub fn project(lat: f64, lon: f64, radius: f64) -> DVec3 {
    let lat_rad = lat.to_radians();
    let lon_rad = -lon.to_radians();
    DVec3::new(
        radius * lat_rad.cos() * lon_rad.cos(),
        radius * lat_rad.sin(),
        radius * lat_rad.cos() * lon_rad.sin(),
    )
}

/// Inverse of [`project`] for any radius.
/// Returns `None` for a (near) zero vector, which has no direction.
pub fn unproject(p: DVec3) -> Option<LatLon> {
    let len = p.length();
    if len < 1e-12 || !len.is_finite() {
        return None;
    }
    let n = p / len;
    let lat = n.y.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = -n.z.atan2(n.x).to_degrees();
    Some(LatLon { lat, lon })
}

/// Outward perpendicular of the edge `from -> to`, lying in the tangent
/// plane described by `normal`. Zero for a zero-length edge.
#[inline(always)]
pub fn edge_perpendicular(from: DVec3, to: DVec3, normal: DVec3) -> DVec3 {
    (to - from).cross(normal).normalize_or_zero()
}

/// Axis-aligned lon/lat bounding box of a ring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn of(ring: &[Position]) -> Option<Self> {
        let first = ring.first()?;
        let init = Self {
            min_lon: first[0],
            min_lat: first[1],
            max_lon: first[0],
            max_lat: first[1],
        };
        Some(ring.iter().fold(init, |b, p| Self {
            min_lon: b.min_lon.min(p[0]),
            min_lat: b.min_lat.min(p[1]),
            max_lon: b.max_lon.max(p[0]),
            max_lat: b.max_lat.max(p[1]),
        }))
    }

    /// Larger of the two extents, in degrees
    pub fn span(&self) -> f64 {
        (self.max_lon - self.min_lon).max(self.max_lat - self.min_lat)
    }
}

/// Arithmetic mean of the ring's vertices as `[lon, lat]`.
pub fn centroid(ring: &[Position]) -> Option<Position> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (sum_lon, sum_lat) = ring
        .iter()
        .fold((0.0, 0.0), |(lon, lat), p| (lon + p[0], lat + p[1]));
    Some([sum_lon / n, sum_lat / n])
}

/// Shoelace area in square degrees (positive = counter-clockwise)
pub fn signed_area(ring: &[Position]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        area += (ring[j][0] - ring[i][0]) * (ring[j][1] + ring[i][1]);
        j = i;
    }
    area / 2.0
}
