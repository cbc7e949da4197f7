//! Precomputed mesh cache written by the batch tool and read at startup.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::MeshConfig;
use crate::data::Country;
use crate::error::{DataError, DataResult};
use crate::map::{build_all_meshes, MeshPair};

/// Bumped whenever the triangulation or file layout changes
pub const CACHE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedCountry {
    pub name: String,
    pub globe: MeshPair,
    pub flat: MeshPair,
}

/// Meshes for every country in both projections
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshCache {
    pub version: u32,
    pub config: MeshConfig,
    pub countries: Vec<CachedCountry>,
}

impl MeshCache {
    pub fn build(countries: &[Country], config: &MeshConfig) -> Self {
        let globe = build_all_meshes(countries, &config.globe(), config.globe_outline_width);
        let flat = build_all_meshes(countries, &config.flat(), config.flat_outline_width);

        let countries: Vec<CachedCountry> = countries
            .iter()
            .zip(globe.into_iter().zip(flat))
            .map(|(country, (globe, flat))| CachedCountry {
                name: country.name.clone(),
                globe,
                flat,
            })
            .collect();

        Self {
            version: CACHE_VERSION,
            config: *config,
            countries,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CachedCountry> {
        self.countries.iter().find(|c| c.name == name)
    }

    pub fn vertex_count(&self) -> usize {
        self.countries
            .iter()
            .map(|c| {
                c.globe.fill.vertices.len()
                    + c.globe.outline.vertices.len()
                    + c.flat.fill.vertices.len()
                    + c.flat.outline.vertices.len()
            })
            .sum()
    }

    pub fn to_json(&self) -> DataResult<Vec<u8>> {
        Ok(simd_json::serde::to_vec(self)?)
    }

    /// Parse a cache document. Parsing happens in place, so `bytes` is clobbered.
    pub fn from_json(bytes: &mut [u8]) -> DataResult<Self> {
        let cache: MeshCache = simd_json::serde::from_slice(bytes)?;
        if cache.version != CACHE_VERSION {
            return Err(DataError::CacheVersion {
                found: cache.version,
                expected: CACHE_VERSION,
            });
        }
        Ok(cache)
    }

    pub fn write(&self, path: &Path) -> DataResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
        }
        let bytes = self.to_json()?;
        fs::write(path, &bytes).map_err(|e| DataError::io(path, e))?;
        info!(
            "Wrote mesh cache for {} countries ({} vertices) to {}",
            self.countries.len(),
            self.vertex_count(),
            path.display()
        );
        Ok(())
    }

    pub fn read(path: &Path) -> DataResult<Self> {
        let mut bytes = fs::read(path).map_err(|e| DataError::io(path, e))?;
        Self::from_json(&mut bytes)
    }
}
