use glam::DVec3;

use crate::geo::{edge_perpendicular, Position};
use crate::map::mesh::Mesh;
use crate::map::projection::Projection;

/// Below this, the miter is too oblique to lengthen
const MITER_MIN_DOT: f64 = 0.3;
/// Longest miter, as a multiple of the half-width
const MITER_LIMIT: f64 = 2.0;

/// Build a closed ribbon of half-width `thickness` along a normalized ring.
///
/// Offsets are taken in the surface's tangent plane at each vertex, so the
/// ribbon hugs the globe (or stays in the z = 0 plane for flat maps).
/// An N-point ring always yields 2N vertices and 6N indices.
pub fn outline_ring(ring: &[Position], thickness: f64, projection: &Projection) -> Mesh {
    let n = ring.len();
    if n < 3 {
        return Mesh::new();
    }

    let points: Vec<DVec3> = ring
        .iter()
        .map(|&[lon, lat]| projection.project(lat, lon))
        .collect();

    let mut mesh = Mesh::with_capacity(n * 2, n * 6);

    for i in 0..n {
        let p = points[i];
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        let normal = projection.normal_at(p);

        let perp_in = edge_perpendicular(prev, p, normal);
        let perp_out = edge_perpendicular(p, next, normal);

        // A full reversal cancels the sum; offset along the incoming edge instead
        let miter = (perp_in + perp_out).try_normalize().unwrap_or(perp_in);
        let dot = miter.dot(perp_in);
        let scale = if dot > MITER_MIN_DOT {
            (thickness / dot).min(thickness * MITER_LIMIT)
        } else {
            thickness
        };

        mesh.push_vertex(p - miter * scale);
        mesh.push_vertex(p + miter * scale);
    }

    for i in 0..n {
        let j = (i + 1) % n;
        let (inner_i, outer_i) = (2 * i as u32, 2 * i as u32 + 1);
        let (inner_j, outer_j) = (2 * j as u32, 2 * j as u32 + 1);
        mesh.push_triangle(inner_i, inner_j, outer_i);
        mesh.push_triangle(outer_i, inner_j, outer_j);
    }

    mesh
}

/// Outline every ring into one combined mesh
pub fn outline_rings<R: AsRef<[Position]>>(rings: &[R], thickness: f64, projection: &Projection) -> Mesh {
    let mut mesh = Mesh::new();
    for ring in rings {
        mesh.append(outline_ring(ring.as_ref(), thickness, projection));
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOBE: Projection = Projection::Globe { radius: 1.0 };
    const FLAT: Projection = Projection::Flat { scale: 1.0 };

    fn square() -> Vec<Position> {
        vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
    }

    fn vertex(mesh: &Mesh, i: usize) -> DVec3 {
        let [x, y, z] = mesh.vertices[i];
        DVec3::new(x as f64, y as f64, z as f64)
    }

    #[test]
    fn test_counts() {
        for n in 3..12 {
            let ring: Vec<Position> = (0..n)
                .map(|i| {
                    let a = i as f64 / n as f64 * std::f64::consts::TAU;
                    [20.0 + 5.0 * a.cos(), 45.0 + 5.0 * a.sin()]
                })
                .collect();
            let mesh = outline_ring(&ring, 0.01, &GLOBE);
            assert_eq!(mesh.vertices.len(), 2 * n);
            assert_eq!(mesh.indices.len(), 6 * n);
            assert!(mesh.is_consistent());
        }
    }

    #[test]
    fn test_closed_at_wrap() {
        let n = square().len() as u32;
        let mesh = outline_ring(&square(), 0.01, &GLOBE);
        let last_quad = &mesh.indices[mesh.indices.len() - 6..];
        // Last quad joins vertex pair N-1 to pair 0
        assert!(last_quad.contains(&(2 * (n - 1))));
        assert!(last_quad.contains(&(2 * (n - 1) + 1)));
        assert!(last_quad.contains(&0));
        assert!(last_quad.contains(&1));
    }

    #[test]
    fn test_flat_square_offsets() {
        let t = 0.5;
        let mesh = outline_ring(&square(), t, &FLAT);
        for v in &mesh.vertices {
            assert_eq!(v[2], 0.0);
        }
        // Right-angle corner: miter is t / cos(45°), under the 2t cap
        let corner = DVec3::new(0.0, 0.0, 0.0);
        let expected = t * std::f64::consts::SQRT_2;
        for i in 0..2 {
            assert!(((vertex(&mesh, i) - corner).length() - expected).abs() < 1e-5);
        }
        // The pair straddles the corner
        let mid = (vertex(&mesh, 0) + vertex(&mesh, 1)) * 0.5;
        assert!((mid - corner).length() < 1e-6);
    }

    #[test]
    fn test_miter_capped_at_sharp_spike() {
        let t = 0.1;
        let ring = vec![[0.0, 0.0], [10.0, 0.5], [0.0, 1.0]];
        let mesh = outline_ring(&ring, t, &FLAT);
        let tip = DVec3::new(10.0, 0.5, 0.0);
        for i in 2..4 {
            let d = (vertex(&mesh, i) - tip).length();
            assert!(d <= 2.0 * t + 1e-5, "d = {d}");
        }
    }

    #[test]
    fn test_globe_offsets_are_tangent() {
        let t = 0.02;
        let mesh = outline_ring(&square(), t, &GLOBE);
        for (i, &[lon, lat]) in square().iter().enumerate() {
            let p = GLOBE.project(lat, lon);
            let normal = GLOBE.normal_at(p);
            for k in 0..2 {
                let offset = vertex(&mesh, 2 * i + k) - p;
                assert!(offset.dot(normal).abs() < 1e-5);
                assert!(offset.length() >= t - 1e-5 && offset.length() <= 2.0 * t + 1e-5);
            }
        }
    }

    #[test]
    fn test_degenerate_ring() {
        assert!(outline_ring(&[[0.0, 0.0], [1.0, 1.0]], 0.1, &GLOBE).is_empty());
    }

    #[test]
    fn test_combines_rings() {
        let rings = vec![square(), vec![[30.0, 0.0], [31.0, 0.0], [31.0, 1.0]]];
        let mesh = outline_rings(&rings, 0.01, &GLOBE);
        assert_eq!(mesh.vertices.len(), 14);
        assert_eq!(mesh.indices.len(), 42);
        assert!(mesh.is_consistent());
    }
}
