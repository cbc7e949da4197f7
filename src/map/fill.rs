use crate::geo::{self, Bounds, Position};
use crate::locate::point_in_ring;
use crate::map::mesh::Mesh;
use crate::map::projection::Projection;

/// Rings whose extent is below this are fan-filled from their centroid
pub const FAN_MAX_SPAN: f64 = 0.5;

/// Ring area, relative to its bounding box, that counts as no area at all
const AREA_EPSILON: f64 = 1e-12;

/// How a ring's interior gets triangulated
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FillStrategy {
    /// Centroid fan over the ring's vertices
    Fan,
    /// Quads on a lon/lat grid, kept where the cell center is inside
    Grid { cell: f64 },
}

impl FillStrategy {
    /// Pick a strategy from the ring's larger bounding-box extent (degrees)
    pub fn for_span(span: f64) -> Self {
        if span < FAN_MAX_SPAN {
            FillStrategy::Fan
        } else if span < 2.0 {
            FillStrategy::Grid { cell: 0.05 }
        } else if span < 10.0 {
            FillStrategy::Grid { cell: 0.15 }
        } else {
            FillStrategy::Grid { cell: 0.3 }
        }
    }
}

/// Fill a single normalized ring. Zero-area rings yield an empty mesh.
pub fn fill_ring(ring: &[Position], projection: &Projection) -> Mesh {
    if ring.len() < 3 {
        return Mesh::new();
    }
    let Some(bounds) = Bounds::of(ring) else {
        return Mesh::new();
    };
    if is_zero_area(ring, &bounds) {
        return Mesh::new();
    }

    match FillStrategy::for_span(bounds.span()) {
        FillStrategy::Fan => fill_fan(ring, projection),
        FillStrategy::Grid { cell } => {
            let mesh = fill_grid(ring, &bounds, cell, projection);
            // Thin rings can slip between cell centers
            if mesh.is_empty() {
                fill_fan(ring, projection)
            } else {
                mesh
            }
        }
    }
}

/// Collinear or collapsed rings. Scaled by the bounding box so that tiny
/// but real rings still fill.
fn is_zero_area(ring: &[Position], bounds: &Bounds) -> bool {
    let box_area = (bounds.max_lon - bounds.min_lon) * (bounds.max_lat - bounds.min_lat);
    geo::signed_area(ring).abs() <= box_area * AREA_EPSILON
}

/// Fill every ring into one combined mesh
pub fn fill_rings<R: AsRef<[Position]>>(rings: &[R], projection: &Projection) -> Mesh {
    let mut mesh = Mesh::new();
    for ring in rings {
        mesh.append(fill_ring(ring.as_ref(), projection));
    }
    mesh
}

/// Centroid vertex plus one vertex per ring point, N triangles
fn fill_fan(ring: &[Position], projection: &Projection) -> Mesh {
    let Some([c_lon, c_lat]) = geo::centroid(ring) else {
        return Mesh::new();
    };
    let n = ring.len();
    let mut mesh = Mesh::with_capacity(n + 1, n * 3);

    let center = mesh.push_vertex(projection.project(c_lat, c_lon));
    for &[lon, lat] in ring {
        mesh.push_vertex(projection.project(lat, lon));
    }
    for i in 0..n {
        let a = center + 1 + i as u32;
        let b = center + 1 + ((i + 1) % n) as u32;
        mesh.push_triangle(center, a, b);
    }
    mesh
}

/// Scan the bounding box in `cell` steps and emit a quad for every cell
/// whose center lies inside the ring
fn fill_grid(ring: &[Position], bounds: &Bounds, cell: f64, projection: &Projection) -> Mesh {
    let cols = ((bounds.max_lon - bounds.min_lon) / cell).ceil() as usize;
    let rows = ((bounds.max_lat - bounds.min_lat) / cell).ceil() as usize;
    let mut mesh = Mesh::new();

    for row in 0..rows {
        let lat = bounds.min_lat + row as f64 * cell;
        let center_lat = lat + cell * 0.5;

        for col in 0..cols {
            let lon = bounds.min_lon + col as f64 * cell;
            if !point_in_ring(center_lat, lon + cell * 0.5, ring) {
                continue;
            }

            let a = mesh.push_vertex(projection.project(lat, lon));
            let b = mesh.push_vertex(projection.project(lat, lon + cell));
            let c = mesh.push_vertex(projection.project(lat + cell, lon + cell));
            let d = mesh.push_vertex(projection.project(lat + cell, lon));
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }
    mesh
}
