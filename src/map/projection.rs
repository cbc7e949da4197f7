use glam::DVec3;

use crate::geo::{self, LatLon};

/// Output space for generated meshes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Sphere of the given radius centered on the origin
    Globe { radius: f64 },
    /// Equirectangular plane at z = 0: `x = lon * scale`, `y = lat * scale`
    Flat { scale: f64 },
}

impl Projection {
    /// Project a geographic coordinate (degrees) into mesh space
    #[inline(always)]
    pub fn project(&self, lat: f64, lon: f64) -> DVec3 {
        match *self {
            Projection::Globe { radius } => geo::project(lat, lon, radius),
            Projection::Flat { scale } => DVec3::new(lon * scale, lat * scale, 0.0),
        }
    }

    /// Unproject a point in mesh space back to lat/lon.
    /// Globe points are treated as directions, so any ray hit works.
    pub fn unproject(&self, p: DVec3) -> Option<LatLon> {
        match *self {
            Projection::Globe { .. } => geo::unproject(p),
            Projection::Flat { scale } => {
                if scale.abs() < f64::EPSILON {
                    return None;
                }
                let lat = p.y / scale;
                let lon = p.x / scale;
                if lat.abs() > 90.0 || lon.abs() > 180.0 {
                    return None;
                }
                Some(LatLon::new(lat, lon))
            }
        }
    }

    /// Unit outward normal of the surface at a projected point
    #[inline(always)]
    pub fn normal_at(&self, p: DVec3) -> DVec3 {
        match *self {
            Projection::Globe { radius } => p / radius,
            Projection::Flat { .. } => DVec3::Z,
        }
    }
}
