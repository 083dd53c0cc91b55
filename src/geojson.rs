//! GeoJSON geometry parsing (RFC 7946 subset).
//!
//! Parses `Point`, `MultiPoint`, `LineString`, `MultiLineString` and
//! `Polygon` objects into a [`ShapeContainer`]. `MultiPolygon` and
//! `GeometryCollection` are rejected with `NotImplemented`; every malformed
//! input is rejected with `BadParameter` and a human-readable reason.
//!
//! Positions are `[lon, lat]` arrays with at least two numeric elements
//! (extra elements are ignored). The `type` member is matched
//! case-insensitively. A polygon's first ring is the exterior, subsequent
//! rings must be holes contained in it; each ring must be closed and keep at
//! least 3 distinct vertices after adjacent-duplicate removal. A single
//! closed ring of exactly 4 distinct vertices forming axis-aligned right
//! angles in (lat,lng) is recognised as a latitude/longitude rectangle.

use crate::error::{GeoError, Result};
use crate::geometry::Coordinate;
use crate::shape::{BBox, ShapeContainer};
use geo::{Contains, Validation};
use geo_types::{LineString, MultiLineString, Polygon};
use serde_json::Value;

/// GeoJSON geometry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeoJsonType {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
    Unknown,
}

fn geojson_type(value: &Value) -> GeoJsonType {
    let Some(name) = value.get("type").and_then(Value::as_str) else {
        return GeoJsonType::Unknown;
    };
    if name.eq_ignore_ascii_case("Point") {
        GeoJsonType::Point
    } else if name.eq_ignore_ascii_case("MultiPoint") {
        GeoJsonType::MultiPoint
    } else if name.eq_ignore_ascii_case("LineString") {
        GeoJsonType::LineString
    } else if name.eq_ignore_ascii_case("MultiLineString") {
        GeoJsonType::MultiLineString
    } else if name.eq_ignore_ascii_case("Polygon") {
        GeoJsonType::Polygon
    } else if name.eq_ignore_ascii_case("MultiPolygon") {
        GeoJsonType::MultiPolygon
    } else if name.eq_ignore_ascii_case("GeometryCollection") {
        GeoJsonType::GeometryCollection
    } else {
        GeoJsonType::Unknown
    }
}

/// Parse a GeoJSON geometry object into a filter region.
pub fn parse_region(value: &Value) -> Result<ShapeContainer> {
    if !value.is_object() {
        return Err(bad("Invalid GeoJSON Geometry Object."));
    }
    match geojson_type(value) {
        GeoJsonType::Point => ShapeContainer::point(parse_point(value)?),
        GeoJsonType::MultiPoint => ShapeContainer::multi_point(&parse_points(value)?),
        GeoJsonType::LineString => Ok(ShapeContainer::polyline(parse_linestring(value)?)),
        GeoJsonType::MultiLineString => {
            Ok(ShapeContainer::multi_polyline(parse_multi_linestring(value)?))
        }
        GeoJsonType::Polygon => parse_polygon(value),
        GeoJsonType::MultiPolygon | GeoJsonType::GeometryCollection => Err(
            GeoError::NotImplemented("GeoJSON type is not supported".to_string()),
        ),
        GeoJsonType::Unknown => Err(bad("Invalid GeoJSON Geometry Object.")),
    }
}

/// Parse a GeoJSON string into a filter region.
pub fn parse_region_str(geojson: &str) -> Result<ShapeContainer> {
    let value: Value =
        serde_json::from_str(geojson).map_err(|e| bad(format!("Malformed JSON: {e}")))?;
    parse_region(&value)
}

/// Parse a GeoJSON `Point` object into a coordinate.
pub fn parse_point(value: &Value) -> Result<Coordinate> {
    let coordinates = value.get("coordinates").ok_or_else(|| bad("Coordinates missing"))?;
    let arr = coordinates
        .as_array()
        .filter(|a| a.len() == 2)
        .ok_or_else(|| bad("Invalid GeoJSON Geometry Object."))?;
    parse_position(arr)
}

fn parse_position(position: &[Value]) -> Result<Coordinate> {
    if position.len() < 2 {
        return Err(bad(format!(
            "Bad coordinate {}",
            Value::Array(position.to_vec())
        )));
    }
    let (lon, lat) = match (position[0].as_f64(), position[1].as_f64()) {
        (Some(lon), Some(lat)) => (lon, lat),
        _ => {
            return Err(bad(format!(
                "Bad coordinate {}",
                Value::Array(position.to_vec())
            )))
        }
    };
    let c = Coordinate::new(lat, lon);
    if !c.is_valid() {
        return Err(bad(format!("Bad coordinate {c}")));
    }
    Ok(c)
}

/// Parse an array of `[lon, lat]` positions, either from a geometry object's
/// `coordinates` member or from a bare array.
pub fn parse_points(value: &Value) -> Result<Vec<Coordinate>> {
    let coordinates = if value.is_object() {
        value.get("coordinates").ok_or_else(|| bad("Coordinates missing"))?
    } else {
        value
    };
    let arr = coordinates.as_array().ok_or_else(|| bad("Coordinates missing"))?;

    let mut vertices = Vec::with_capacity(arr.len());
    for position in arr {
        let pos = position
            .as_array()
            .ok_or_else(|| bad(format!("Bad coordinate {position}")))?;
        vertices.push(parse_position(pos)?);
    }
    Ok(vertices)
}

/// Parse a GeoJSON `LineString` (object or bare coordinate array).
pub fn parse_linestring(value: &Value) -> Result<LineString<f64>> {
    let mut vertices = parse_points(value)?;
    remove_adjacent_duplicates(&mut vertices);
    if vertices.len() < 2 {
        return Err(bad(
            "Invalid LineString, adjacent vertices must not be identical or antipodal.",
        ));
    }
    Ok(to_linestring(&vertices))
}

/// Parse a GeoJSON `MultiLineString` object.
pub fn parse_multi_linestring(value: &Value) -> Result<MultiLineString<f64>> {
    if !value.is_object() {
        return Err(bad("Invalid MultiLineString"));
    }
    let coordinates = value.get("coordinates").ok_or_else(|| bad("Coordinates missing"))?;
    let arr = coordinates.as_array().ok_or_else(|| bad("Coordinates missing"))?;

    let mut lines = Vec::with_capacity(arr.len());
    for linestring in arr {
        if !linestring.is_array() {
            return Err(bad("Invalid MultiLineString"));
        }
        lines.push(parse_linestring(linestring)?);
    }
    Ok(MultiLineString::new(lines))
}

/// Parse a GeoJSON `Polygon` object.
///
/// The first ring is the exterior, subsequent rings must be holes contained
/// in it. A single ring of exactly 4 distinct vertices with axis-aligned
/// right angles in (lat,lng) yields a rectangle region instead.
pub fn parse_polygon(value: &Value) -> Result<ShapeContainer> {
    let coordinates = if value.is_object() {
        value.get("coordinates").ok_or_else(|| bad("coordinates missing"))?
    } else {
        value
    };
    let rings = coordinates.as_array().ok_or_else(|| bad("coordinates missing"))?;
    let n = rings.len();

    let mut outer: Option<Polygon<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring_value in rings {
        let mut vtx = parse_points(ring_value)?;
        verify_closed_loop(&vtx)?;
        remove_adjacent_duplicates(&mut vtx);

        // the closing vertex still counts, so 4 means 3 distinct
        if vtx.len() < 4 {
            return Err(bad(
                "Invalid loop in polygon, must have at least 3 distinct vertices",
            ));
        }
        vtx.pop(); // drop the redundant closing vertex

        if n == 1 && vtx.len() == 4 {
            // rectangle detection: opposite edges aligned to the lat/lng grid
            let (v0, v1, v2, v3) = (&vtx[0], &vtx[1], &vtx[2], &vtx[3]);
            if v0.latitude == v1.latitude
                && v1.longitude == v2.longitude
                && v2.latitude == v3.latitude
                && v3.longitude == v0.longitude
            {
                // v0 and v2 are diagonally opposite; normalise so either
                // winding yields the same box
                return Ok(ShapeContainer::rect(BBox::new(
                    v0.latitude.min(v2.latitude),
                    v0.latitude.max(v2.latitude),
                    v0.longitude.min(v2.longitude),
                    v0.longitude.max(v2.longitude),
                )));
            }
        }

        let ring = to_linestring(&vtx);
        let loop_polygon = Polygon::new(ring.clone(), vec![]);
        if !loop_polygon.is_valid() {
            return Err(bad("Invalid loop in polygon"));
        }

        match &outer {
            None => outer = Some(loop_polygon),
            Some(first) => {
                if !first.contains(&loop_polygon) {
                    return Err(bad("Subsequent loop not a hole in polygon"));
                }
                holes.push(ring);
            }
        }
    }

    match outer {
        Some(first) => {
            let polygon = Polygon::new(first.exterior().clone(), holes);
            debug_assert!(polygon.is_valid());
            Ok(ShapeContainer::polygon(polygon))
        }
        None => Err(bad("Empty polygons are not allowed")),
    }
}

fn verify_closed_loop(vertices: &[Coordinate]) -> Result<()> {
    match (vertices.first(), vertices.last()) {
        (None, _) => Err(bad("Empty loop")),
        (Some(first), Some(last)) if first != last => Err(bad("Loop not closed")),
        _ => Ok(()),
    }
}

fn remove_adjacent_duplicates(vertices: &mut Vec<Coordinate>) {
    vertices.dedup();
}

fn to_linestring(vertices: &[Coordinate]) -> LineString<f64> {
    LineString::from(
        vertices
            .iter()
            .map(|c| (c.longitude, c.latitude))
            .collect::<Vec<_>>(),
    )
}

fn bad(reason: impl Into<String>) -> GeoError {
    GeoError::BadParameter(reason.into())
}
