//! S2 cell machinery: coverings, scan intervals, and scanned-cell tracking.
//!
//! S2 cells have several properties the engine relies on:
//! - Hilbert-curve ordering: a sorted range of cell ids covers a contiguous
//!   patch of the sphere, so coverings translate directly into range scans
//! - Hierarchical: cells at level N contain 4 children at level N+1, and a
//!   cell's descendants occupy the id range `[range_min, range_max]`
//! - Equal-area (roughly): the diagonal of a cell at a given level is a
//!   known fraction of the sphere, which drives the adaptive step size
//!
//! The search region of one expansion step is either a spherical cap or an
//! annulus (outer cap minus inner cap). The annulus is expressed as a
//! [`Region`] so the stock [`RegionCoverer`] can approximate it with cells.

use crate::error::{GeoError, Result};
use crate::geometry::Coordinate;
use s2::cap::Cap;
use s2::cell::Cell;
use s2::cellid::CellID;
use s2::latlng::LatLng;
use s2::point::Point;
use s2::rect::Rect;
use s2::region::{Region, RegionCoverer};
use s2::s1::angle::Angle;
use s2::s1::Rad;

/// Finest cell level of the decomposition.
pub const MAX_CELL_LEVEL: u8 = 30;

// Length-metric derivatives of the S2 decomposition (projection-corrected
// quadratic projection). The Rust `s2` port does not export the metrics
// table, so the two diagonal constants are declared here;
// `value(level) = deriv * 2^-level`.
const MAX_DIAG_DERIV: f64 = 2.438654594434021145;
const AVG_DIAG_DERIV: f64 = 2.060422738998471683;

/// Maximum diagonal in radians of a cell at `level`.
pub fn max_diag(level: u8) -> f64 {
    MAX_DIAG_DERIV * (-(level as i32) as f64).exp2()
}

/// Average diagonal in radians of a cell at `level`.
pub fn avg_diag(level: u8) -> f64 {
    AVG_DIAG_DERIV * (-(level as i32) as f64).exp2()
}

/// Level whose maximum cell diagonal is closest to `value` radians.
pub fn closest_level_for_diag(value: f64) -> u8 {
    let level = (MAX_DIAG_DERIV / value).log2().round();
    level.clamp(0.0, MAX_CELL_LEVEL as f64) as u8
}

/// Leaf cell id containing a coordinate, at [`MAX_CELL_LEVEL`].
pub fn cell_for_point(c: &Coordinate) -> Result<CellID> {
    if !c.is_valid() {
        return Err(GeoError::BadParameter(format!("invalid coordinate {c}")));
    }
    Ok(CellID::from(LatLng::from_degrees(c.latitude, c.longitude)))
}

/// Closed range `[min, max]` of leaf cell ids to be looked up in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub min: CellID,
    pub max: CellID,
}

impl Interval {
    pub fn new(min: CellID, max: CellID) -> Self {
        debug_assert!(min.0 <= max.0);
        Self { min, max }
    }

    /// Whether a cell id falls inside this interval.
    pub fn contains(&self, cell: CellID) -> bool {
        self.min.0 <= cell.0 && cell.0 <= self.max.0
    }
}

/// Collapse a set of covering cells into contiguous leaf-id ranges.
///
/// Each cell expands to the id range of its leaf descendants; overlapping or
/// adjacent ranges are fused. The output is sorted by `min`, pairwise
/// disjoint, and its union equals the set of leaf ids under the inputs.
/// `worst_level` is the coarsest level the coverer may emit and bounds the
/// inputs from below.
pub fn scan_intervals(worst_level: u8, cells: &[CellID]) -> Vec<Interval> {
    if cells.is_empty() {
        return Vec::new();
    }
    debug_assert!(cells
        .iter()
        .all(|c| c.level() as u64 >= worst_level as u64));

    let mut ranges: Vec<(u64, u64)> = cells
        .iter()
        .map(|c| (c.range_min().0, c.range_max().0))
        .collect();
    ranges.sort_unstable_by_key(|r| r.0);

    let mut merged = Vec::with_capacity(ranges.len());
    let mut current = ranges[0];
    for range in ranges.into_iter().skip(1) {
        if range.0 <= current.1.saturating_add(1) {
            current.1 = current.1.max(range.1);
        } else {
            merged.push(Interval::new(CellID(current.0), CellID(current.1)));
            current = range;
        }
    }
    merged.push(Interval::new(CellID(current.0), CellID(current.1)));
    merged
}

/// Normalised set of closed leaf-id ranges.
///
/// Tracks the region already handed out as scan intervals so no cell is
/// ever returned twice. Ranges are kept sorted, disjoint and non-adjacent.
#[derive(Debug, Clone, Default)]
pub struct CellRangeSet {
    ranges: Vec<(u64, u64)>,
}

impl CellRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Add an interval, fusing with any overlapping or adjacent ranges.
    pub fn insert(&mut self, iv: &Interval) {
        let (mut lo, mut hi) = (iv.min.0, iv.max.0);
        debug_assert!(lo <= hi);

        // first range that could fuse with [lo, hi]
        let start = self
            .ranges
            .partition_point(|r| r.1 < lo.saturating_sub(1));
        let mut end = start;
        while end < self.ranges.len() && self.ranges[end].0 <= hi.saturating_add(1) {
            lo = lo.min(self.ranges[end].0);
            hi = hi.max(self.ranges[end].1);
            end += 1;
        }
        self.ranges.splice(start..end, std::iter::once((lo, hi)));
    }

    /// Whether a cell id is covered by the set.
    pub fn covers(&self, cell: CellID) -> bool {
        let i = self.ranges.partition_point(|r| r.1 < cell.0);
        i < self.ranges.len() && self.ranges[i].0 <= cell.0
    }

    /// Parts of the given intervals not yet covered by the set.
    ///
    /// The input must be sorted and disjoint (the [`scan_intervals`]
    /// contract); the output is too.
    pub fn subtract(&self, intervals: &[Interval]) -> Vec<Interval> {
        let mut out = Vec::with_capacity(intervals.len());
        for iv in intervals {
            let mut lo = iv.min.0;
            let hi = iv.max.0;
            let mut i = self.ranges.partition_point(|r| r.1 < lo);
            while lo <= hi {
                if i >= self.ranges.len() || self.ranges[i].0 > hi {
                    out.push(Interval::new(CellID(lo), CellID(hi)));
                    break;
                }
                let (rs, re) = self.ranges[i];
                if rs > lo {
                    out.push(Interval::new(CellID(lo), CellID(rs - 1)));
                }
                if re >= hi {
                    break;
                }
                lo = re + 1;
                i += 1;
            }
        }
        out
    }
}

/// Annulus on the sphere: an outer cap minus the interior of an inner cap.
///
/// Expressed as the intersection of the outer cap with the complement of
/// the inner cap, so cell containment/intersection tests compose from the
/// two cap tests and the stock coverer can be used directly.
pub(crate) struct Annulus {
    inner: Cap,
    outer: Cap,
}

impl Annulus {
    pub(crate) fn new(origin: &Point, inner_rad: f64, outer_rad: f64) -> Self {
        debug_assert!(0.0 <= inner_rad && inner_rad <= outer_rad);
        Self {
            inner: cap_at(origin, inner_rad),
            outer: cap_at(origin, outer_rad),
        }
    }
}

impl Region for Annulus {
    fn cap_bound(&self) -> Cap {
        self.outer.clone()
    }

    fn rect_bound(&self) -> Rect {
        self.outer.rect_bound()
    }

    fn contains_cell(&self, cell: &Cell) -> bool {
        self.outer.contains_cell(cell) && !self.inner.intersects_cell(cell)
    }

    fn intersects_cell(&self, cell: &Cell) -> bool {
        self.outer.intersects_cell(cell) && !self.inner.contains_cell(cell)
    }
}

fn cap_at(origin: &Point, radius_rad: f64) -> Cap {
    let angle = Angle::from(Rad(radius_rad));
    Cap::from_center_angle(origin, &angle)
}

/// Cover a spherical cap around `origin`.
pub(crate) fn covering_for_cap(
    coverer: &RegionCoverer,
    origin: &Point,
    radius_rad: f64,
) -> Vec<CellID> {
    coverer.covering(&cap_at(origin, radius_rad)).0
}

/// Cover the annulus between two concentric caps around `origin`.
pub(crate) fn covering_for_annulus(
    coverer: &RegionCoverer,
    origin: &Point,
    inner_rad: f64,
    outer_rad: f64,
) -> Vec<CellID> {
    coverer
        .covering(&Annulus::new(origin, inner_rad, outer_rad))
        .0
}

/// Cover a latitude/longitude rectangle.
pub(crate) fn covering_for_rect(coverer: &RegionCoverer, rect: &Rect) -> Vec<CellID> {
    coverer.covering(rect).0
}
