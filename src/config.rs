//! Query configuration and validation.

use crate::covering::MAX_CELL_LEVEL;
use crate::error::{GeoError, Result};
use crate::geojson;
use crate::geometry::{Coordinate, EARTH_RADIUS_METERS, MAX_RADIANS_BETWEEN_POINTS};
use crate::shape::ShapeContainer;
use s2::region::RegionCoverer;
use serde::Deserialize;
use serde_json::Value;

/// Filter semantics applied to reported documents and scan cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// No filtering; pure distance query.
    #[default]
    None,

    /// Only documents whose centroid lies inside the filter shape.
    Contains,

    /// Candidate documents from cells that may intersect the filter shape.
    /// The exact intersection test is the caller's responsibility, and the
    /// result stream is unordered by contract.
    Intersects,
}

/// Controls how search regions are approximated by cell coverings.
///
/// `worst_indexed_level` is the coarsest level the coverer may emit,
/// `best_indexed_level` the finest; coarser levels mean fewer but larger
/// cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverParams {
    pub worst_indexed_level: u8,
    pub best_indexed_level: u8,
    pub max_cells: usize,
}

impl Default for CoverParams {
    fn default() -> Self {
        Self {
            worst_indexed_level: 4,
            best_indexed_level: 23,
            max_cells: 8,
        }
    }
}

impl CoverParams {
    pub(crate) fn coverer(&self) -> RegionCoverer {
        RegionCoverer {
            min_level: self.worst_indexed_level,
            max_level: self.best_indexed_level,
            level_mod: 1,
            max_cells: self.max_cells,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.worst_indexed_level == 0
            || self.worst_indexed_level > self.best_indexed_level
            || self.best_indexed_level > MAX_CELL_LEVEL
        {
            return Err(GeoError::BadParameter(
                "invalid cover levels".to_string(),
            ));
        }
        if self.max_cells == 0 {
            return Err(GeoError::BadParameter(
                "cover must allow at least one cell".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration of one near query.
#[derive(Debug, Clone)]
pub struct QueryParams {
    /// Point from which distances are measured.
    pub origin: Coordinate,

    /// Minimum distance from the origin in meters.
    pub min_distance: f64,

    /// Maximum distance from the origin in meters. Values beyond half the
    /// Earth circumference are clamped at conversion time.
    pub max_distance: f64,

    /// The engine only supports distance-sorted scans.
    pub sorted: bool,

    /// Sort direction; must match the engine's order parameter.
    pub ascending: bool,

    pub filter_type: FilterType,

    /// Filter region; required iff `filter_type != None`.
    pub filter_shape: Option<ShapeContainer>,

    pub cover: CoverParams,
}

impl QueryParams {
    /// Parameters for an unbounded ascending query around `origin`.
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            sorted: true,
            ascending: true,
            filter_type: FilterType::None,
            filter_shape: None,
            cover: CoverParams::default(),
        }
    }

    /// Minimum distance as a central angle on the unit sphere.
    pub fn min_distance_rad(&self) -> f64 {
        (self.min_distance / EARTH_RADIUS_METERS).min(MAX_RADIANS_BETWEEN_POINTS)
    }

    /// Maximum distance as a central angle on the unit sphere, clamped to pi.
    pub fn max_distance_rad(&self) -> f64 {
        (self.max_distance / EARTH_RADIUS_METERS).min(MAX_RADIANS_BETWEEN_POINTS)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.origin.is_valid() {
            return Err(GeoError::BadParameter(format!(
                "invalid origin coordinate {}",
                self.origin
            )));
        }
        if self.min_distance.is_nan() || self.min_distance < 0.0 {
            return Err(GeoError::BadParameter(
                "minDistance must be a non-negative number".to_string(),
            ));
        }
        if self.max_distance.is_nan() || self.max_distance < self.min_distance {
            return Err(GeoError::BadParameter(
                "maxDistance must not be smaller than minDistance".to_string(),
            ));
        }
        if !self.sorted {
            return Err(GeoError::BadParameter(
                "near queries are always sorted by distance".to_string(),
            ));
        }
        match (self.filter_type, &self.filter_shape) {
            (FilterType::None, Some(_)) => {
                return Err(GeoError::BadParameter(
                    "filter shape given without a filter type".to_string(),
                ));
            }
            (FilterType::Contains | FilterType::Intersects, None) => {
                return Err(GeoError::BadParameter(
                    "filter requires a filter shape".to_string(),
                ));
            }
            _ => {}
        }
        self.cover.validate()
    }

    /// Deserialise query parameters from a JSON object:
    ///
    /// ```json
    /// {
    ///   "origin": {"lat": 48.85, "lon": 2.35},
    ///   "minDistance": 0,
    ///   "maxDistance": 5000,
    ///   "ascending": true,
    ///   "filter": {"type": "contains", "shape": {"type": "Polygon", ...}}
    /// }
    /// ```
    pub fn from_json(value: &Value) -> Result<QueryParams> {
        let raw: RawParams = serde_json::from_value(value.clone())
            .map_err(|e| GeoError::BadParameter(format!("invalid query parameters: {e}")))?;

        let mut params = QueryParams::new(raw.origin);
        params.min_distance = raw.min_distance;
        if let Some(max) = raw.max_distance {
            params.max_distance = max;
        }
        params.ascending = raw.ascending;

        if let Some(filter) = raw.filter {
            params.filter_type = if filter.kind.eq_ignore_ascii_case("contains") {
                FilterType::Contains
            } else if filter.kind.eq_ignore_ascii_case("intersects") {
                FilterType::Intersects
            } else if filter.kind.eq_ignore_ascii_case("none") {
                FilterType::None
            } else {
                return Err(GeoError::BadParameter(format!(
                    "unknown filter type '{}'",
                    filter.kind
                )));
            };
            if params.filter_type != FilterType::None {
                params.filter_shape = Some(geojson::parse_region(&filter.shape)?);
            }
        }

        params.validate()?;
        Ok(params)
    }

    /// Deserialise query parameters from a JSON string.
    pub fn from_json_str(json: &str) -> Result<QueryParams> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| GeoError::BadParameter(format!("Malformed JSON: {e}")))?;
        Self::from_json(&value)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParams {
    origin: Coordinate,
    #[serde(default)]
    min_distance: f64,
    max_distance: Option<f64>,
    #[serde(default = "default_ascending")]
    ascending: bool,
    filter: Option<RawFilter>,
}

fn default_ascending() -> bool {
    true
}

#[derive(Deserialize)]
struct RawFilter {
    #[serde(rename = "type")]
    kind: String,
    shape: Value,
}
