//! Filter regions for near-search queries.
//!
//! A [`ShapeContainer`] wraps one of six region kinds and offers exactly the
//! two capabilities the engine needs:
//!
//! - `contains(point)`: exact point-in-region predicate, used to gate
//!   reported documents when the filter mode requires containment
//! - `may_intersect(cell)`: conservative cell-level test, used to drop
//!   covering cells that can provably produce no matches (`false` means
//!   definitely disjoint)
//!
//! # Design
//!
//! The cell-level test works against the shape's own S2 covering, computed
//! once at construction and held as fused leaf-id ranges: a cell may
//! intersect the shape iff its leaf range overlaps one of them. Point kinds
//! cover themselves exactly by leaf cell; line and polygon kinds cover their
//! bounding rectangle, which is conservative. The exact predicate runs on
//! planar lat/lng geometry via the `geo` crate.

use crate::config::CoverParams;
use crate::covering::{self, scan_intervals};
use crate::error::Result;
use crate::geometry::Coordinate;
use geo::{BoundingRect, Contains};
use geo_types::{LineString, MultiLineString, MultiPoint, Point, Polygon};
use s2::cellid::CellID;
use s2::rect::Rect;

/// Discriminator for the six supported region kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Point,
    MultiPoint,
    Polyline,
    MultiPolyline,
    Polygon,
    Rect,
}

/// Axis-aligned latitude/longitude box.
///
/// An inverted box (`min > max` on either axis) is empty and contains
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lng > self.max_lng
    }

    pub fn contains_point(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

#[derive(Debug, Clone)]
enum ShapeGeom {
    Point(Point<f64>),
    MultiPoint(MultiPoint<f64>),
    Polyline(LineString<f64>),
    MultiPolyline(MultiLineString<f64>),
    Polygon(Polygon<f64>),
    Rect(BBox),
}

/// A parsed filter region.
#[derive(Debug, Clone)]
pub struct ShapeContainer {
    geom: ShapeGeom,
    /// Fused leaf-id ranges of the shape's S2 covering.
    covering: Vec<(u64, u64)>,
}

impl ShapeContainer {
    /// Single point region.
    pub fn point(c: Coordinate) -> Result<Self> {
        let leaf = covering::cell_for_point(&c)?;
        Ok(Self {
            geom: ShapeGeom::Point(Point::new(c.longitude, c.latitude)),
            covering: vec![(leaf.0, leaf.0)],
        })
    }

    /// Set-of-points region.
    pub fn multi_point(coords: &[Coordinate]) -> Result<Self> {
        let mut cells = Vec::with_capacity(coords.len());
        for c in coords {
            cells.push(covering::cell_for_point(c)?);
        }
        let points = coords
            .iter()
            .map(|c| Point::new(c.longitude, c.latitude))
            .collect::<Vec<_>>();
        Ok(Self {
            geom: ShapeGeom::MultiPoint(MultiPoint::new(points)),
            covering: fuse(&cells),
        })
    }

    /// Polyline region.
    pub fn polyline(line: LineString<f64>) -> Self {
        let covering = bbox_covering(line.bounding_rect());
        Self {
            geom: ShapeGeom::Polyline(line),
            covering,
        }
    }

    /// Multi-polyline region.
    pub fn multi_polyline(lines: MultiLineString<f64>) -> Self {
        let covering = bbox_covering(lines.bounding_rect());
        Self {
            geom: ShapeGeom::MultiPolyline(lines),
            covering,
        }
    }

    /// Polygon region; the exterior ring comes first, holes after.
    pub fn polygon(polygon: Polygon<f64>) -> Self {
        let covering = bbox_covering(polygon.bounding_rect());
        Self {
            geom: ShapeGeom::Polygon(polygon),
            covering,
        }
    }

    /// Latitude/longitude rectangle region.
    pub fn rect(bbox: BBox) -> Self {
        let covering = if bbox.is_empty() {
            Vec::new()
        } else {
            let rect =
                Rect::from_degrees(bbox.min_lat, bbox.min_lng, bbox.max_lat, bbox.max_lng);
            cover_rect(&rect)
        };
        Self {
            geom: ShapeGeom::Rect(bbox),
            covering,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match &self.geom {
            ShapeGeom::Point(_) => ShapeKind::Point,
            ShapeGeom::MultiPoint(_) => ShapeKind::MultiPoint,
            ShapeGeom::Polyline(_) => ShapeKind::Polyline,
            ShapeGeom::MultiPolyline(_) => ShapeKind::MultiPolyline,
            ShapeGeom::Polygon(_) => ShapeKind::Polygon,
            ShapeGeom::Rect(_) => ShapeKind::Rect,
        }
    }

    /// Exact point-in-region predicate.
    pub fn contains(&self, c: &Coordinate) -> bool {
        let pt = Point::new(c.longitude, c.latitude);
        match &self.geom {
            ShapeGeom::Point(p) => *p == pt,
            ShapeGeom::MultiPoint(mp) => mp.iter().any(|p| *p == pt),
            ShapeGeom::Polyline(line) => line.contains(&pt),
            ShapeGeom::MultiPolyline(lines) => lines.iter().any(|line| line.contains(&pt)),
            ShapeGeom::Polygon(polygon) => polygon.contains(&pt),
            ShapeGeom::Rect(bbox) => bbox.contains_point(c.latitude, c.longitude),
        }
    }

    /// Conservative cell-level intersection test: `false` means the cell is
    /// definitely disjoint from the region.
    pub fn may_intersect(&self, cell: CellID) -> bool {
        let lo = cell.range_min().0;
        let hi = cell.range_max().0;
        let i = self.covering.partition_point(|r| r.1 < lo);
        i < self.covering.len() && self.covering[i].0 <= hi
    }
}

fn fuse(cells: &[CellID]) -> Vec<(u64, u64)> {
    scan_intervals(0, cells)
        .iter()
        .map(|iv| (iv.min.0, iv.max.0))
        .collect()
}

fn cover_rect(rect: &Rect) -> Vec<(u64, u64)> {
    let coverer = CoverParams::default().coverer();
    fuse(&covering::covering_for_rect(&coverer, rect))
}

fn bbox_covering(rect: Option<geo_types::Rect<f64>>) -> Vec<(u64, u64)> {
    match rect {
        // y is latitude, x is longitude
        Some(rect) => {
            let s2_rect = Rect::from_degrees(
                rect.min().y,
                rect.min().x,
                rect.max().y,
                rect.max().x,
            );
            cover_rect(&s2_rect)
        }
        None => Vec::new(),
    }
}
