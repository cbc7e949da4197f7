use crate::geo::Position;

/// Clean a raw GeoJSON ring into a usable `[lon, lat]` ring.
///
/// Drops tuples with fewer than two or non-finite coordinates, collapses
/// consecutive repeats, and strips the GeoJSON closing vertex. Rings with
/// fewer than three distinct points come back as `None`.
pub fn normalize_ring<P: AsRef<[f64]>>(raw: &[P]) -> Option<Vec<Position>> {
    let mut ring: Vec<Position> = Vec::with_capacity(raw.len());

    for coords in raw {
        let Some(pos) = to_position(coords.as_ref()) else {
            continue;
        };
        if ring.last() != Some(&pos) {
            ring.push(pos);
        }
    }

    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    if ring.len() < 3 {
        return None;
    }
    Some(ring)
}

/// Read the first two entries of a coordinate tuple as `[lon, lat]`.
/// Extra entries (altitude) are ignored.
#[inline(always)]
pub fn to_position(coords: &[f64]) -> Option<Position> {
    match coords {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some([*lon, *lat]),
        _ => None,
    }
}
