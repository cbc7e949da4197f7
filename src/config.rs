use serde::{Deserialize, Serialize};

use crate::map::Projection;

/// Mesh generation settings shared by the cache builder and runtime callers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Globe radius in scene units
    pub globe_radius: f64,
    /// Outline half-width on the globe, in scene units
    pub globe_outline_width: f64,
    /// Flat map units per degree
    pub flat_scale: f64,
    /// Outline half-width on the flat map, in flat units
    pub flat_outline_width: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            globe_radius: 1.0,
            globe_outline_width: 0.003,
            flat_scale: 1.0,
            flat_outline_width: 0.15,
        }
    }
}

impl MeshConfig {
    pub fn globe(&self) -> Projection {
        Projection::Globe {
            radius: self.globe_radius,
        }
    }

    pub fn flat(&self) -> Projection {
        Projection::Flat {
            scale: self.flat_scale,
        }
    }
}
