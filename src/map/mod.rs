mod fill;
mod mesh;
mod outline;
mod projection;
mod spatial;

pub use fill::{fill_ring, fill_rings, FillStrategy, FAN_MAX_SPAN};
pub use mesh::Mesh;
pub use outline::{outline_ring, outline_rings};
pub use projection::Projection;
pub use spatial::{FeatureGrid, RingRef};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::Country;

/// Fill and outline meshes for one country in one projection
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPair {
    pub fill: Mesh,
    pub outline: Mesh,
}

impl MeshPair {
    pub fn is_empty(&self) -> bool {
        self.fill.is_empty() && self.outline.is_empty()
    }
}

/// Build both meshes for a country. Marker-rendered countries get empty
/// meshes; the renderer draws a marker for them instead.
pub fn build_country_meshes(country: &Country, projection: &Projection, outline_width: f64) -> MeshPair {
    if !country.is_filled() {
        return MeshPair::default();
    }
    MeshPair {
        fill: fill_rings(&country.rings, projection),
        outline: outline_rings(&country.rings, outline_width, projection),
    }
}

/// Build meshes for every country in parallel, keeping dataset order
pub fn build_all_meshes(countries: &[Country], projection: &Projection, outline_width: f64) -> Vec<MeshPair> {
    countries
        .par_iter()
        .map(|country| build_country_meshes(country, projection, outline_width))
        .collect()
}
