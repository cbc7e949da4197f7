//! Point location: which country contains a coordinate.

use std::f64::consts::TAU;

use crate::data::{Country, GeometryKind};

/// Point countries within this planar distance (degrees) win outright
pub const POINT_HIT_RADIUS: f64 = 0.8;

/// Radii (degrees) sampled when the exact coordinate misses every polygon
pub const FALLBACK_RADII: [f64; 4] = [0.5, 1.0, 2.0, 3.0];

/// Samples taken around the query at each fallback radius
pub const FALLBACK_SAMPLES: usize = 8;

/// Even-odd ray cast against a ring of `[lon, lat, ..]` tuples.
///
/// Works on raw GeoJSON positions as well as normalized rings; edges with
/// an endpoint missing a coordinate are skipped. A repeated closing vertex
/// only adds a zero-length edge, which never crosses.
pub fn point_in_ring<P: AsRef<[f64]>>(lat: f64, lon: f64, ring: &[P]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        if let ([xi, yi, ..], [xj, yj, ..]) = (ring[i].as_ref(), ring[j].as_ref()) {
            if (*yi > lat) != (*yj > lat) {
                let x = (xj - xi) * (lat - yi) / (yj - yi) + xi;
                if x > lon {
                    inside = !inside;
                }
            }
        }
        j = i;
    }
    inside
}

/// Whether any ring of a polygon country contains the coordinate
pub fn country_contains(country: &Country, lat: f64, lon: f64) -> bool {
    country.kind == GeometryKind::Polygon && country.rings.iter().any(|ring| point_in_ring(lat, lon, ring))
}

/// Resolve a coordinate against the full country list.
///
/// Marker countries within [`POINT_HIT_RADIUS`] take priority, then the
/// exact polygon test, then rings of samples at [`FALLBACK_RADII`].
pub fn find_country(lat: f64, lon: f64, countries: &[Country]) -> Option<&Country> {
    resolve(lat, lon, countries, |lat, lon| {
        countries.iter().find(|c| country_contains(c, lat, lon))
    })
}

/// Shared resolution order. `exact` answers the plain polygon test for a
/// coordinate and must return the first match in dataset order.
pub(crate) fn resolve<'a, F>(lat: f64, lon: f64, countries: &'a [Country], exact: F) -> Option<&'a Country>
where
    F: Fn(f64, f64) -> Option<&'a Country>,
{
    if let Some(country) = first_marker_within(lat, lon, countries) {
        return Some(country);
    }

    if let Some(country) = exact(lat, lon) {
        return Some(country);
    }

    fallback_samples(lat, lon).find_map(|(sample_lat, sample_lon)| exact(sample_lat, sample_lon))
}

/// First marker country within [`POINT_HIT_RADIUS`], in dataset order
fn first_marker_within(lat: f64, lon: f64, countries: &[Country]) -> Option<&Country> {
    countries.iter().find(|c| {
        c.marker()
            .is_some_and(|m| m.planar_distance(lat, lon) < POINT_HIT_RADIUS)
    })
}

/// Sample coordinates around the query, innermost radius first
pub fn fallback_samples(lat: f64, lon: f64) -> impl Iterator<Item = (f64, f64)> {
    FALLBACK_RADII.into_iter().flat_map(move |radius| {
        (0..FALLBACK_SAMPLES).map(move |i| {
            let angle = i as f64 * TAU / FALLBACK_SAMPLES as f64;
            (lat + radius * angle.sin(), lon + radius * angle.cos())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, lon: f64, lat: f64, size: f64) -> Country {
        Country::polygon(
            name,
            vec![vec![
                [lon, lat],
                [lon + size, lat],
                [lon + size, lat + size],
                [lon, lat + size],
            ]],
        )
    }

    #[test]
    fn test_square_classification() {
        let ring = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        assert!(point_in_ring(5.0, 5.0, &ring));
        assert!(!point_in_ring(5.0, 15.0, &ring));
        assert!(!point_in_ring(5.0, -5.0, &ring));
        assert!(!point_in_ring(15.0, 5.0, &ring));
    }

    #[test]
    fn test_closing_vertex_tolerated() {
        let ring = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];
        assert!(point_in_ring(5.0, 5.0, &ring));
        assert!(!point_in_ring(5.0, 11.0, &ring));
    }

    #[test]
    fn test_malformed_edges_skipped() {
        let ring: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![10.0],
            vec![10.0, 10.0],
            vec![0.0, 10.0],
        ];
        // Both edges touching the short tuple drop out, leaving only the
        // left edge to cross the ray
        assert!(point_in_ring(5.0, -1.0, &ring));
        assert!(!point_in_ring(5.0, 5.0, &ring));
        assert!(!point_in_ring(5.0, 20.0, &ring));
    }

    #[test]
    fn test_concave_ring() {
        // U shape open to the north
        let ring = [
            [0.0, 0.0], [9.0, 0.0], [9.0, 9.0], [6.0, 9.0],
            [6.0, 3.0], [3.0, 3.0], [3.0, 9.0], [0.0, 9.0],
        ];
        assert!(point_in_ring(6.0, 1.5, &ring));
        assert!(!point_in_ring(6.0, 4.5, &ring));
        assert!(point_in_ring(6.0, 7.5, &ring));
    }

    #[test]
    fn test_exact_match_first_in_order() {
        let countries = vec![square("A", 0.0, 0.0, 10.0), square("B", 0.0, 0.0, 10.0)];
        assert_eq!(find_country(5.0, 5.0, &countries).map(|c| c.name.as_str()), Some("A"));
    }

    #[test]
    fn test_point_country_priority() {
        let countries = vec![
            square("Big", 0.0, 0.0, 20.0),
            Country::point("Dot", 10.0, 10.0),
        ];
        assert_eq!(find_country(10.0, 10.0, &countries).unwrap().name, "Dot");
        assert_eq!(find_country(10.3, 10.0, &countries).unwrap().name, "Dot");
        assert_eq!(find_country(10.0, 10.79, &countries).unwrap().name, "Dot");
        assert_eq!(find_country(10.0, 10.81, &countries).unwrap().name, "Big");
    }

    #[test]
    fn test_first_marker_in_range_wins() {
        // Dataset order decides, not distance
        let countries = vec![Country::point("Outer", 0.0, 0.7), Country::point("Inner", 0.0, 0.1)];
        assert_eq!(find_country(0.0, 0.0, &countries).unwrap().name, "Outer");
        assert_eq!(find_country(0.0, -0.75, &countries).unwrap().name, "Inner");
    }

    #[test]
    fn test_point_country_without_polygon_hit() {
        let countries = vec![square("Far", 50.0, 50.0, 1.0), Country::point("Islet", -20.0, 150.0)];
        assert_eq!(find_country(-20.0, 150.0, &countries).unwrap().name, "Islet");
        assert_eq!(find_country(-20.3, 150.0, &countries).unwrap().name, "Islet");
    }

    #[test]
    fn test_fallback_recovers_small_island() {
        let countries = vec![square("Isle", 0.3, -0.2, 0.4)];
        assert!(!country_contains(&countries[0], 0.0, 0.0));
        assert_eq!(find_country(0.0, 0.0, &countries).unwrap().name, "Isle");
    }

    #[test]
    fn test_fallback_wider_radius() {
        // Only reachable from the 2° ring of samples (north)
        let countries = vec![square("North", -0.5, 1.7, 1.0)];
        assert_eq!(find_country(0.0, 0.0, &countries).unwrap().name, "North");
    }

    #[test]
    fn test_miss_returns_none() {
        let countries = vec![square("Far", 40.0, 40.0, 2.0), Country::point("Dot", -40.0, -40.0)];
        assert!(find_country(0.0, 0.0, &countries).is_none());
        assert!(find_country(0.0, 0.0, &[]).is_none());
    }

    #[test]
    fn test_fallback_sample_order() {
        let samples: Vec<_> = fallback_samples(10.0, 20.0).collect();
        assert_eq!(samples.len(), FALLBACK_RADII.len() * FALLBACK_SAMPLES);
        let (lat, lon) = samples[0];
        assert!((lat - 10.0).abs() < 1e-12 && (lon - 20.5).abs() < 1e-12);
        let (lat, lon) = samples[2];
        assert!((lat - 10.5).abs() < 1e-12 && (lon - 20.0).abs() < 1e-12);
        let (lat, lon) = samples[FALLBACK_SAMPLES * 3];
        assert!((lat - 10.0).abs() < 1e-12 && (lon - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_flagged_polygon_both_definitions() {
        let flagged = square("Flagged", 0.0, 0.0, 4.0).rendered_as_point();
        let countries = vec![flagged];
        // Marker at the centroid (2, 2)
        assert_eq!(find_country(2.5, 2.5, &countries).unwrap().name, "Flagged");
        // Far corner of the polygon still hits through the ring test
        assert_eq!(find_country(3.9, 3.9, &countries).unwrap().name, "Flagged");
    }
}
