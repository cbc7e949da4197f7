//! Country polygon meshing and point location for globe and flat maps.
//!
//! Normalized country rings are filled with adaptive grid or fan
//! triangulations, traced with mitered outline ribbons, and hit-tested
//! with an even-odd ray cast plus a radial fallback search.

pub mod cache;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod locate;
pub mod map;

pub use cache::MeshCache;
pub use config::MeshConfig;
pub use data::{Country, GeometryKind, Ring};
pub use dataset::Dataset;
pub use error::{DataError, DataResult};
pub use geo::{project, unproject, LatLon};
pub use locate::{find_country, point_in_ring};
pub use map::{Mesh, MeshPair, Projection};
