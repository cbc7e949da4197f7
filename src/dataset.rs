use glam::DVec3;
use log::info;

use crate::data::{Country, GeometryKind};
use crate::geo::Bounds;
use crate::locate::{self, point_in_ring};
use crate::map::{FeatureGrid, Projection};

/// Grid cell size (degrees) for the ring index
const INDEX_CELL_SIZE: f64 = 5.0;

/// An immutable, loaded country set with a ring index for hit-testing.
///
/// Build once per dataset load and share by reference or `Arc`; nothing
/// here mutates after construction.
pub struct Dataset {
    countries: Vec<Country>,
    index: FeatureGrid,
}

impl Dataset {
    pub fn new(countries: Vec<Country>) -> Self {
        let rings = countries
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == GeometryKind::Polygon)
            .flat_map(|(ci, c)| {
                c.rings
                    .iter()
                    .enumerate()
                    .filter_map(move |(ri, ring)| Bounds::of(ring).map(|b| ((ci, ri), b)))
            });
        let index = FeatureGrid::build(rings, INDEX_CELL_SIZE);
        info!(
            "Indexed {} countries into {} grid cells",
            countries.len(),
            index.cell_count()
        );
        Self { countries, index }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.name == name)
    }

    /// Which country a coordinate falls in. Same answer as
    /// [`locate::find_country`], using the ring index.
    pub fn find_country(&self, lat: f64, lon: f64) -> Option<&Country> {
        locate::resolve(lat, lon, &self.countries, |lat, lon| self.contains_exact(lat, lon))
    }

    /// Resolve a tap already hit-tested against the globe or flat map
    pub fn country_at(&self, point: DVec3, projection: &Projection) -> Option<&Country> {
        let position = projection.unproject(point)?;
        self.find_country(position.lat, position.lon)
    }

    fn contains_exact(&self, lat: f64, lon: f64) -> Option<&Country> {
        self.index
            .candidates(lon, lat)
            .iter()
            .find(|&&(ci, ri)| point_in_ring(lat, lon, &self.countries[ci].rings[ri]))
            .map(|&(ci, _)| &self.countries[ci])
    }
}
