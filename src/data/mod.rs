mod normalize;

pub use normalize::{normalize_ring, to_position};

use crate::error::{DataError, DataResult};
use crate::geo::{self, LatLon, Position};
use geojson::{GeoJson, JsonObject, JsonValue};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// A normalized outer ring: at least three distinct `[lon, lat]` points,
/// no duplicated closing vertex.
pub type Ring = Vec<Position>;

/// Geometry a country was defined with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    Point,
}

/// Capital city metadata, carried through untouched
#[derive(Clone, Debug, PartialEq)]
pub struct Capital {
    pub name: String,
    pub position: LatLon,
}

/// A country as consumed by the mesher and the point locator.
/// Read-only once the dataset is loaded.
#[derive(Clone, Debug)]
pub struct Country {
    pub name: String,
    pub rings: Vec<Ring>,
    pub kind: GeometryKind,
    /// Present iff `kind == Point`
    pub point: Option<LatLon>,
    /// `renderAs: "point"`: drawn as a marker even when polygonal
    pub render_as_point: bool,
    pub continent: Option<String>,
    pub flag_code: Option<String>,
    pub capital: Option<Capital>,
    marker: Option<LatLon>,
}

impl Country {
    pub fn polygon(name: impl Into<String>, rings: Vec<Ring>) -> Self {
        Self {
            name: name.into(),
            rings,
            kind: GeometryKind::Polygon,
            point: None,
            render_as_point: false,
            continent: None,
            flag_code: None,
            capital: None,
            marker: None,
        }
    }

    pub fn point(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        let position = LatLon::new(lat, lon);
        Self {
            name: name.into(),
            rings: Vec::new(),
            kind: GeometryKind::Point,
            point: Some(position),
            render_as_point: true,
            continent: None,
            flag_code: None,
            capital: None,
            marker: Some(position),
        }
    }

    /// Draw this country as a marker while keeping its rings for hit-testing.
    pub fn rendered_as_point(mut self) -> Self {
        self.render_as_point = true;
        self.refresh_marker();
        self
    }

    pub fn with_capital(mut self, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.capital = Some(Capital {
            name: name.into(),
            position: LatLon::new(lat, lon),
        });
        self.refresh_marker();
        self
    }

    pub fn with_continent(mut self, continent: impl Into<String>) -> Self {
        self.continent = Some(continent.into());
        self
    }

    pub fn with_flag_code(mut self, code: impl Into<String>) -> Self {
        self.flag_code = Some(code.into());
        self
    }

    /// Where the marker sits for point-rendered countries. Point countries
    /// use their coordinate; flagged polygons use the capital, falling back
    /// to the centroid of their largest ring.
    pub fn marker(&self) -> Option<LatLon> {
        self.marker
    }

    /// Whether meshes should be generated for this country
    pub fn is_filled(&self) -> bool {
        self.kind == GeometryKind::Polygon && !self.render_as_point
    }

    fn refresh_marker(&mut self) {
        self.marker = match self.kind {
            GeometryKind::Point => self.point,
            GeometryKind::Polygon if self.render_as_point => self
                .capital
                .as_ref()
                .map(|c| c.position)
                .or_else(|| largest_ring_centroid(&self.rings)),
            GeometryKind::Polygon => None,
        };
    }
}

fn largest_ring_centroid(rings: &[Ring]) -> Option<LatLon> {
    rings
        .iter()
        .max_by(|a, b| geo::signed_area(a).abs().total_cmp(&geo::signed_area(b).abs()))
        .and_then(|ring| geo::centroid(ring))
        .map(|[lon, lat]| LatLon::new(lat, lon))
}

/// Outer rings or a point, already normalized
enum Shape {
    Rings(Vec<Ring>),
    Point(LatLon),
}

/// Load countries from a GeoJSON file
pub fn load_countries(path: &Path) -> DataResult<Vec<Country>> {
    let mut bytes = fs::read(path).map_err(|e| DataError::io(path, e))?;
    let countries = countries_from_slice(&mut bytes)?;
    info!("Loaded {} countries from {}", countries.len(), path.display());
    Ok(countries)
}

/// Parse countries from an in-memory GeoJSON document
pub fn parse_countries(content: &str) -> DataResult<Vec<Country>> {
    let mut bytes = content.as_bytes().to_vec();
    countries_from_slice(&mut bytes)
}

/// Convert an already parsed GeoJSON document
pub fn countries_from_geojson(geojson: &GeoJson) -> Vec<Country> {
    let countries: Vec<Country> = match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .filter_map(|f| feature_to_country(&JsonValue::Object(JsonObject::from(f))))
            .collect(),
        GeoJson::Feature(f) => feature_to_country(&JsonValue::Object(JsonObject::from(f)))
            .into_iter()
            .collect(),
        GeoJson::Geometry(_) => Vec::new(),
    };
    warn_if_empty(&countries);
    countries
}

/// Features are read one at a time from the raw JSON tree, so a malformed
/// feature only drops itself. Parsing happens in place.
fn countries_from_slice(bytes: &mut [u8]) -> DataResult<Vec<Country>> {
    let document: JsonValue = simd_json::serde::from_slice(bytes)?;
    let countries: Vec<Country> = match document.get("type").and_then(JsonValue::as_str) {
        Some("FeatureCollection") => document
            .get("features")
            .and_then(JsonValue::as_array)
            .map(|features| features.iter().filter_map(feature_to_country).collect())
            .unwrap_or_default(),
        Some("Feature") => feature_to_country(&document).into_iter().collect(),
        // A bare geometry has no name to attach
        Some(_) => Vec::new(),
        None => return Err(DataError::NotGeoJson),
    };
    warn_if_empty(&countries);
    Ok(countries)
}

fn warn_if_empty(countries: &[Country]) {
    if countries.is_empty() {
        warn!("GeoJSON input produced no countries");
    }
}

fn feature_to_country(feature: &JsonValue) -> Option<Country> {
    let properties = feature.get("properties").and_then(JsonValue::as_object);
    let property = |key: &str| properties.and_then(|p| p.get(key));

    let Some(name) = property("name")
        .or_else(|| property("NAME"))
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        debug!("Skipping feature without a name");
        return None;
    };

    let mut country = match read_shape(name, feature.get("geometry"))? {
        Shape::Rings(rings) => Country::polygon(name, rings),
        Shape::Point(position) => Country::point(name, position.lat, position.lon),
    };

    if let Some(continent) = property("continent").and_then(JsonValue::as_str) {
        country = country.with_continent(continent);
    }
    if let Some(code) = property("flagCode").and_then(JsonValue::as_str) {
        country = country.with_flag_code(code);
    }
    if let Some((capital, lat, lon)) = properties.and_then(read_capital) {
        country = country.with_capital(capital, lat, lon);
    }
    if property("renderAs").and_then(JsonValue::as_str) == Some("point") {
        country = country.rendered_as_point();
    }

    Some(country)
}

fn read_shape(name: &str, geometry: Option<&JsonValue>) -> Option<Shape> {
    let Some(geometry) = geometry.filter(|g| !g.is_null()) else {
        debug!("Skipping {name}: no geometry");
        return None;
    };
    let coordinates = geometry.get("coordinates");

    let shape = match geometry.get("type").and_then(JsonValue::as_str) {
        Some("Polygon") => Shape::Rings(coordinates.and_then(outer_ring).into_iter().collect()),
        Some("MultiPolygon") => Shape::Rings(
            coordinates
                .and_then(JsonValue::as_array)
                .map(|polygons| polygons.iter().filter_map(outer_ring).collect())
                .unwrap_or_default(),
        ),
        Some("Point") => {
            let Some([lon, lat]) = coordinates.and_then(read_position) else {
                debug!("Skipping {name}: malformed point");
                return None;
            };
            Shape::Point(LatLon::new(lat, lon))
        }
        other => {
            debug!("Skipping {name}: unsupported geometry type {other:?}");
            return None;
        }
    };

    if matches!(&shape, Shape::Rings(rings) if rings.is_empty()) {
        debug!("Skipping {name}: no valid rings");
        return None;
    }
    Some(shape)
}

/// First ring of a polygon's coordinate array, holes ignored
fn outer_ring(polygon: &JsonValue) -> Option<Ring> {
    let outer = polygon.as_array()?.first()?.as_array()?;
    let positions: Vec<Position> = outer.iter().filter_map(read_position).collect();
    normalize_ring(&positions)
}

/// A coordinate tuple with every entry numeric and at least lon/lat
fn read_position(value: &JsonValue) -> Option<Position> {
    let coords: Vec<f64> = value
        .as_array()?
        .iter()
        .map(JsonValue::as_f64)
        .collect::<Option<_>>()?;
    to_position(&coords)
}

/// Capital as either `capital` + `capitalLat` + `capitalLon`, or an object
/// `capital: { name, lat, lon }`.
fn read_capital(properties: &JsonObject) -> Option<(String, f64, f64)> {
    match properties.get("capital")? {
        JsonValue::String(name) => {
            let lat = properties.get("capitalLat").and_then(JsonValue::as_f64)?;
            let lon = properties.get("capitalLon").and_then(JsonValue::as_f64)?;
            Some((name.clone(), lat, lon))
        }
        JsonValue::Object(obj) => {
            let name = obj.get("name").and_then(JsonValue::as_str)?;
            let lat = obj.get("lat").and_then(JsonValue::as_f64)?;
            let lon = obj.get("lon").and_then(JsonValue::as_f64)?;
            Some((name.to_string(), lat, lon))
        }
        _ => None,
    }
}
