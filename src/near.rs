//! Streaming nearest-neighbour search engine.
//!
//! [`NearSearch`] drives a storage-engine-agnostic scan that yields
//! documents in strict distance order while minimising the area of the
//! sphere that must be examined. The sphere is swept in concentric annuli
//! around the origin; the width of each annulus adapts to the observed
//! point density, so a dense neighbourhood shrinks the step and a sparse
//! one grows it.
//!
//! # Protocol
//!
//! ```text
//! while !near.is_done() {
//!     for interval in near.intervals() {
//!         // resolve the interval against storage
//!         for (cell, id) in provider.scan(&interval) {
//!             near.report_found(id, &provider.centroid(id));
//!         }
//!     }
//!     while near.has_nearest() {
//!         emit(near.pop_nearest());
//!     }
//! }
//! ```
//!
//! The buffer may only release a result once no unscanned region could hold
//! a closer one (farther, when descending); that is what [`has_nearest`]
//! gates on. Cells handed out by [`intervals`] are tracked so the caller
//! never re-reads them, and reported ids are de-duplicated across the
//! overlapping coverings of consecutive annuli.
//!
//! With `FilterType::Intersects` the engine only narrows the scan to cells
//! that may intersect the filter shape; documents are released as they come,
//! unordered and without distance-range checks. Callers needing ordered
//! intersects-results must sort downstream.
//!
//! [`has_nearest`]: NearSearch::has_nearest
//! [`intervals`]: NearSearch::intervals

use crate::config::{FilterType, QueryParams};
use crate::covering::{
    self, avg_diag, closest_level_for_diag, max_diag, scan_intervals, CellRangeSet, Interval,
    MAX_CELL_LEVEL,
};
use crate::error::{GeoError, Result};
use crate::geometry::{
    angle_between, Coordinate, Document, LocalDocumentId, EARTH_RADIUS_METERS,
    MAX_RADIANS_BETWEEN_POINTS,
};
use rustc_hash::FxHashSet;
use s2::cellid::CellID;
use s2::point::Point;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

/// Sort order of the result stream, fixed at construction.
///
/// A type-level parameter because it flips both the comparator polarity and
/// the expansion direction, and no instance ever switches.
pub trait SortOrder: sealed::Sealed + 'static {
    const ASCENDING: bool;
}

/// Nearest documents first.
#[derive(Debug, Clone, Copy)]
pub enum Ascending {}

/// Farthest documents first.
#[derive(Debug, Clone, Copy)]
pub enum Descending {}

impl SortOrder for Ascending {
    const ASCENDING: bool = true;
}

impl SortOrder for Descending {
    const ASCENDING: bool = false;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Ascending {}
    impl Sealed for super::Descending {}
}

/// Heap entry; the next document to emit sits on top.
#[derive(Debug)]
struct Ranked<O: SortOrder> {
    doc: Document,
    _order: PhantomData<O>,
}

impl<O: SortOrder> Ranked<O> {
    fn new(doc: Document) -> Self {
        Self {
            doc,
            _order: PhantomData,
        }
    }
}

impl<O: SortOrder> PartialEq for Ranked<O> {
    fn eq(&self, other: &Self) -> bool {
        self.doc.dist_rad.total_cmp(&other.doc.dist_rad) == Ordering::Equal
    }
}

impl<O: SortOrder> Eq for Ranked<O> {}

impl<O: SortOrder> PartialOrd for Ranked<O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<O: SortOrder> Ord for Ranked<O> {
    fn cmp(&self, other: &Self) -> Ordering {
        if O::ASCENDING {
            // min-heap on distance
            other.doc.dist_rad.total_cmp(&self.doc.dist_rad)
        } else {
            self.doc.dist_rad.total_cmp(&other.doc.dist_rad)
        }
    }
}

/// Streaming nearest-neighbour search around an origin.
///
/// Created per query, driven through
/// `intervals()` / `report_found()` / `pop_nearest()`, dropped once
/// `is_done()` is observed true and the buffer has been drained.
pub struct NearSearch<O: SortOrder> {
    params: QueryParams,

    /// Origin on the unit sphere from which distances are measured.
    origin: Point,

    /// Minimum distance in radians on the unit sphere.
    min_bound: f64,
    /// Maximum distance in radians on the unit sphere.
    max_bound: f64,

    /// Amount to advance the window by, in radians.
    bound_delta: f64,
    /// Inner limit of the current search annulus.
    inner_bound: f64,
    /// Outer limit of the current search annulus.
    outer_bound: f64,

    /// Documents reported since the last delta adjustment.
    stats_found_last_interval: usize,

    /// Buffered results, next-to-emit on top.
    buffer: BinaryHeap<Ranked<O>>,

    deduplicate: bool,
    seen: FxHashSet<LocalDocumentId>,

    /// Region already handed out as scan intervals.
    scanned: CellRangeSet,
}

/// Nearest-first search.
pub type NearAscending = NearSearch<Ascending>;

/// Farthest-first search.
pub type NearDescending = NearSearch<Descending>;

impl<O: SortOrder> NearSearch<O> {
    /// Validate the parameters and set up a fresh search.
    ///
    /// `deduplicate` toggles the seen-set; leave it on whenever the storage
    /// engine may resolve a document through more than one cell.
    pub fn new(params: QueryParams, deduplicate: bool) -> Result<Self> {
        params.validate()?;
        if params.ascending != O::ASCENDING {
            return Err(GeoError::BadParameter(
                "sort direction does not match the query parameters".to_string(),
            ));
        }

        let origin = params.origin.to_point();
        let min_bound = params.min_distance_rad();
        let max_bound = params.max_distance_rad();
        debug_assert!(0.0 <= min_bound && min_bound <= max_bound);
        debug_assert!(max_bound <= MAX_RADIANS_BETWEEN_POINTS);

        let mut search = Self {
            params,
            origin,
            min_bound,
            max_bound,
            bound_delta: 0.0,
            inner_bound: 0.0,
            outer_bound: 0.0,
            stats_found_last_interval: 0,
            buffer: BinaryHeap::new(),
            deduplicate,
            seen: FxHashSet::default(),
            scanned: CellRangeSet::new(),
        };
        search.reset();
        Ok(search)
    }

    /// Origin on the unit sphere.
    pub fn origin(&self) -> &Point {
        &self.origin
    }

    pub fn filter_type(&self) -> FilterType {
        self.params.filter_type
    }

    pub fn filter_shape(&self) -> Option<&crate::shape::ShapeContainer> {
        self.params.filter_shape.as_ref()
    }

    /// Return the engine to its just-constructed state.
    ///
    /// An adapted `bound_delta` survives the reset, so a restarted query
    /// keeps the learned density.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.buffer.clear();
        self.scanned.clear();

        if self.bound_delta <= 0.0 {
            let level = 1.max(self.params.cover.best_indexed_level as i32 - 2);
            // level 15 is a diagonal of roughly 474m
            let level = level.min(closest_level_for_diag(500.0 / EARTH_RADIUS_METERS) as i32);
            self.bound_delta = max_diag(level as u8);
            debug_assert!(self.bound_delta * EARTH_RADIUS_METERS >= 450.0);
        }

        self.inner_bound = if O::ASCENDING {
            self.min_bound
        } else {
            self.max_bound
        };
        self.outer_bound = self.inner_bound;
        self.stats_found_last_interval = 0;
    }

    /// All possible scan intervals have been handed out.
    fn all_intervals_covered(&self) -> bool {
        let terminal = if O::ASCENDING {
            self.max_bound
        } else {
            self.min_bound
        };
        self.inner_bound == terminal && self.outer_bound == terminal
    }

    fn is_filter_intersects(&self) -> bool {
        self.params.filter_type == FilterType::Intersects
    }

    /// True iff the buffer is drained and every interval has been covered.
    pub fn is_done(&self) -> bool {
        debug_assert!(self.inner_bound >= 0.0 && self.inner_bound <= self.outer_bound);
        debug_assert!(
            self.outer_bound <= self.max_bound && self.max_bound <= MAX_RADIANS_BETWEEN_POINTS
        );
        self.buffer.is_empty() && self.all_intervals_covered()
    }

    /// True iff the top of the buffer may be released right now.
    ///
    /// Results between the inner bound and the maximum bound must be held
    /// back: an unscanned annulus could still produce something that sorts
    /// before them.
    pub fn has_nearest(&self) -> bool {
        if self.all_intervals_covered() || self.is_filter_intersects() {
            return !self.buffer.is_empty();
        }
        match self.buffer.peek() {
            None => false,
            Some(top) => {
                if O::ASCENDING {
                    top.doc.dist_rad <= self.inner_bound
                } else {
                    top.doc.dist_rad >= self.outer_bound
                }
            }
        }
    }

    /// Peek the next result. Meaningful only while [`Self::has_nearest`].
    pub fn nearest(&self) -> Option<&Document> {
        debug_assert!(self.has_nearest());
        self.buffer.peek().map(|r| &r.doc)
    }

    /// Pop the next result. Meaningful only while [`Self::has_nearest`].
    pub fn pop_nearest(&mut self) -> Option<Document> {
        debug_assert!(self.has_nearest());
        self.buffer.pop().map(|r| r.doc)
    }

    /// Advance the annular window by one step and return the cell-id
    /// intervals the caller must resolve against storage.
    ///
    /// Call only when the current intervals hold no more releasable results
    /// (`!has_nearest() && !is_done()`). Already-returned cells are tracked
    /// and never handed out again. Returns an empty vector once the window
    /// has swept the whole distance range.
    pub fn intervals(&mut self) -> Vec<Interval> {
        debug_assert!(!self.has_nearest());
        debug_assert!(!self.is_done());

        self.estimate_delta();

        if O::ASCENDING {
            self.inner_bound = self.outer_bound;
            self.outer_bound = (self.outer_bound + self.bound_delta).min(self.max_bound);
            if self.inner_bound == self.max_bound && self.outer_bound == self.max_bound {
                return Vec::new(); // search is finished
            }
        } else {
            self.outer_bound = self.inner_bound;
            self.inner_bound = (self.inner_bound - self.bound_delta).max(self.min_bound);
            if self.outer_bound == self.min_bound && self.inner_bound == self.min_bound {
                return Vec::new(); // search is finished
            }
        }
        debug_assert!(self.inner_bound <= self.outer_bound);
        debug_assert!(self.outer_bound <= self.max_bound);

        tracing::trace!(
            inner_m = self.inner_bound * EARTH_RADIUS_METERS,
            outer_m = self.outer_bound * EARTH_RADIUS_METERS,
            delta_m = self.bound_delta * EARTH_RADIUS_METERS,
            "advancing scan window"
        );

        let coverer = self.params.cover.coverer();
        let mut cover: Vec<CellID> = if self.inner_bound == self.min_bound {
            // first step: scan the whole cap, range checks reject the rest
            covering::covering_for_cap(&coverer, &self.origin, self.outer_bound)
        } else {
            covering::covering_for_annulus(
                &coverer,
                &self.origin,
                self.inner_bound,
                self.outer_bound,
            )
        };

        if self.params.filter_type != FilterType::None {
            if let Some(shape) = self.params.filter_shape.as_ref() {
                cover.retain(|cell| shape.may_intersect(*cell));
            }
        }
        if cover.is_empty() {
            return Vec::new();
        }

        let candidate = scan_intervals(self.params.cover.worst_indexed_level, &cover);
        let fresh = self.scanned.subtract(&candidate);
        for interval in &fresh {
            self.scanned.insert(interval);
        }
        fresh
    }

    /// Report a document whose centroid lies in a returned interval.
    ///
    /// Cheaply rejected when outside the distance bounds or in a region
    /// already emitted past; de-duplicated; gated on the filter shape when
    /// the filter mode is `Contains`.
    pub fn report_found(&mut self, id: LocalDocumentId, centroid: &Coordinate) {
        let rad = angle_between(&self.origin, &centroid.to_point());

        // cheap rejections based on distance to the origin
        if !self.is_filter_intersects() {
            if (O::ASCENDING && rad < self.inner_bound)
                || (!O::ASCENDING && rad > self.outer_bound)
                || rad > self.max_bound
                || rad < self.min_bound
            {
                return;
            }
        }

        if self.deduplicate {
            self.stats_found_last_interval += 1; // feeds the scan-bound estimate
            if !self.seen.insert(id) {
                return;
            }
        }

        // possibly expensive point rejection, but saves parsing the document
        if self.params.filter_type == FilterType::Contains {
            if let Some(shape) = self.params.filter_shape.as_ref() {
                if !shape.contains(centroid) {
                    return;
                }
            }
        }

        self.buffer.push(Ranked::new(Document::new(id, rad)));
    }

    /// Aid density estimation by reporting a known point close to the
    /// origin before the first `intervals()` call.
    ///
    /// Sets the initial step to four times the distance to that point,
    /// clamped to sane cell-size limits. Never changes which documents the
    /// query returns, only how many storage batches it takes.
    pub fn estimate_density(&mut self, found: &Coordinate) {
        let min_bound = avg_diag(MAX_CELL_LEVEL - 3);
        let delta = angle_between(&self.origin, &found.to_point()) * 4.0;
        if min_bound < delta && delta < MAX_RADIANS_BETWEEN_POINTS {
            self.bound_delta = delta;
            // only meaningful straight after reset
            debug_assert!(self.buffer.is_empty());
            debug_assert!(if O::ASCENDING {
                self.inner_bound == self.min_bound
            } else {
                self.inner_bound == self.max_bound
            });
            tracing::debug!(
                delta_m = self.bound_delta * EARTH_RADIUS_METERS,
                "estimating density"
            );
        }
    }

    /// Adjust `bound_delta` from the number of documents reported since the
    /// last adjustment: nothing found quadruples the step, a thin batch
    /// doubles it, an overflowing batch halves it down to a floor of the
    /// cell diagonal three levels above the finest.
    fn estimate_delta(&mut self) {
        let window_moved = if O::ASCENDING {
            self.inner_bound > self.min_bound
        } else {
            self.inner_bound < self.max_bound
        };
        if window_moved {
            let min_delta = max_diag(MAX_CELL_LEVEL - 3);
            if self.stats_found_last_interval < 256 {
                self.bound_delta *= if self.stats_found_last_interval == 0 {
                    4.0
                } else {
                    2.0
                };
            } else if self.stats_found_last_interval > 1024 && self.bound_delta > min_delta {
                self.bound_delta /= 2.0;
            }
            debug_assert!(self.bound_delta > 0.0);
            self.stats_found_last_interval = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoverParams;
    use crate::shape::ShapeContainer;

    fn params(origin: Coordinate) -> QueryParams {
        QueryParams::new(origin)
    }

    fn drain<O: SortOrder>(near: &mut NearSearch<O>) -> Vec<Document> {
        let mut out = Vec::new();
        while near.has_nearest() {
            out.push(near.pop_nearest().unwrap());
        }
        out
    }

    #[test]
    fn test_order_mismatch_is_rejected() {
        let mut p = params(Coordinate::new(0.0, 0.0));
        p.ascending = false;
        assert!(NearAscending::new(p.clone(), true).is_err());
        assert!(NearDescending::new(p, true).is_ok());
    }

    #[test]
    fn test_fresh_state() {
        let near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), true).unwrap();
        assert!(!near.has_nearest());
        assert!(!near.is_done());
    }

    #[test]
    fn test_release_gate_holds_back_unproven_results() {
        let mut near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), true).unwrap();
        let intervals = near.intervals();
        assert!(!intervals.is_empty());

        // both documents land in the buffer, but after the first batch the
        // proven region is still empty: reports for the current annulus may
        // still be in flight
        near.report_found(LocalDocumentId(1), &Coordinate::new(0.0, 90.0));
        near.report_found(LocalDocumentId(2), &Coordinate::new(0.0, 0.001));
        assert!(!near.has_nearest());

        // advancing the window proves everything below the new inner bound
        let _ = near.intervals();
        assert!(near.has_nearest());
        assert_eq!(near.pop_nearest().unwrap().id, LocalDocumentId(2));
        // the far document still sits beyond the proven region
        assert!(!near.has_nearest());
    }

    #[test]
    fn test_heap_polarity_ascending() {
        let mut near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), true).unwrap();
        let _ = near.intervals();
        near.report_found(LocalDocumentId(1), &Coordinate::new(0.0, 0.002));
        near.report_found(LocalDocumentId(2), &Coordinate::new(0.0, 0.001));
        near.report_found(LocalDocumentId(3), &Coordinate::new(0.0, 0.003));
        let _ = near.intervals();

        let docs = drain(&mut near);
        let ids: Vec<_> = docs.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert!(docs.windows(2).all(|w| w[0].dist_rad <= w[1].dist_rad));
    }

    #[test]
    fn test_duplicate_reports_are_dropped() {
        let mut near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), true).unwrap();
        let _ = near.intervals();
        let c = Coordinate::new(0.0, 0.001);
        near.report_found(LocalDocumentId(7), &c);
        near.report_found(LocalDocumentId(7), &c);
        let _ = near.intervals();
        assert_eq!(drain(&mut near).len(), 1);
    }

    #[test]
    fn test_duplicates_survive_without_dedup() {
        let mut near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), false).unwrap();
        let _ = near.intervals();
        let c = Coordinate::new(0.0, 0.001);
        near.report_found(LocalDocumentId(7), &c);
        near.report_found(LocalDocumentId(7), &c);
        let _ = near.intervals();
        assert_eq!(drain(&mut near).len(), 2);
    }

    #[test]
    fn test_out_of_bounds_reports_are_rejected() {
        let mut p = params(Coordinate::new(0.0, 0.0));
        p.min_distance = 200_000.0;
        p.max_distance = 400_000.0;
        let mut near = NearAscending::new(p, true).unwrap();
        let _ = near.intervals();

        // about 111km: below the minimum distance
        near.report_found(LocalDocumentId(1), &Coordinate::new(0.0, 1.0));
        // about 556km: beyond the maximum distance
        near.report_found(LocalDocumentId(2), &Coordinate::new(0.0, 5.0));
        // about 333km: inside
        near.report_found(LocalDocumentId(3), &Coordinate::new(0.0, 3.0));

        let mut yielded = Vec::new();
        while !near.is_done() {
            yielded.extend(drain(&mut near));
            if near.is_done() {
                break;
            }
            let _ = near.intervals();
        }
        let ids: Vec<_> = yielded.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_intervals_never_hand_out_a_cell_twice() {
        let mut near = NearAscending::new(params(Coordinate::new(10.0, 10.0)), true).unwrap();
        let mut handed_out = CellRangeSet::new();
        for _ in 0..32 {
            if near.is_done() {
                break;
            }
            let intervals = near.intervals();
            let fresh = handed_out.subtract(&intervals);
            assert_eq!(fresh, intervals, "an interval overlapped a previous batch");
            for iv in &intervals {
                handed_out.insert(iv);
            }
        }
        assert!(near.is_done());
    }

    #[test]
    fn test_descending_terminates_and_drains() {
        let mut near = NearDescending::new(
            {
                let mut p = params(Coordinate::new(0.0, 0.0));
                p.ascending = false;
                p
            },
            true,
        )
        .unwrap();

        let mut rounds = 0;
        while !near.is_done() && rounds < 64 {
            let intervals = near.intervals();
            rounds += 1;
            if rounds == 1 {
                assert!(!intervals.is_empty());
                near.report_found(LocalDocumentId(1), &Coordinate::new(0.0, 179.0));
            }
            while near.has_nearest() {
                near.pop_nearest();
            }
        }
        assert!(near.is_done());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), true).unwrap();
        let first = near.intervals();
        // a document at the origin has distance zero and is provable right away
        near.report_found(LocalDocumentId(1), &Coordinate::new(0.0, 0.0));
        assert!(near.has_nearest());

        near.reset();
        assert!(!near.has_nearest());
        assert!(!near.is_done());
        // the same cells are handed out again
        let again = near.intervals();
        assert_eq!(first, again);
    }

    #[test]
    fn test_density_hint_widens_first_step() {
        let mut p = params(Coordinate::new(0.0, 0.0));
        p.max_distance = 2_000_000.0;
        let mut hinted = NearAscending::new(p.clone(), true).unwrap();
        let mut plain = NearAscending::new(p, true).unwrap();

        // a known neighbour 111km out swells the first annulus accordingly
        hinted.estimate_density(&Coordinate::new(0.0, 1.0));

        let hinted_first = hinted.intervals();
        let plain_first = plain.intervals();
        let span = |ivs: &[Interval]| -> u128 {
            ivs.iter().map(|iv| (iv.max.0 - iv.min.0) as u128).sum()
        };
        assert!(span(&hinted_first) > span(&plain_first));
    }

    #[test]
    fn test_density_hint_ignores_degenerate_distances() {
        let mut near = NearAscending::new(params(Coordinate::new(0.0, 0.0)), true).unwrap();
        let before = near.bound_delta;
        // the origin itself carries no density information
        near.estimate_density(&Coordinate::new(0.0, 0.0));
        assert_eq!(near.bound_delta, before);
        // and neither does a point at the antipode
        near.estimate_density(&Coordinate::new(0.0, 180.0));
        assert_eq!(near.bound_delta, before);
    }

    #[test]
    fn test_intersects_filter_bypasses_gate_and_bounds() {
        let mut p = params(Coordinate::new(0.0, 0.0));
        p.max_distance = 100_000.0;
        p.filter_type = FilterType::Intersects;
        p.filter_shape = Some(
            ShapeContainer::multi_point(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 3.0)])
                .unwrap(),
        );
        let mut near = NearAscending::new(p, true).unwrap();
        let _ = near.intervals();

        // outside max_distance, but intersects-mode skips the range check
        near.report_found(LocalDocumentId(1), &Coordinate::new(0.0, 3.0));
        // and the release gate
        assert!(near.has_nearest());
        assert_eq!(near.pop_nearest().unwrap().id, LocalDocumentId(1));
    }

    #[test]
    fn test_contains_filter_gates_documents() {
        let mut p = params(Coordinate::new(0.0, 0.0));
        p.filter_type = FilterType::Contains;
        p.filter_shape = Some(ShapeContainer::rect(crate::shape::BBox::new(
            -0.5, 0.5, -0.5, 0.5,
        )));
        let mut near = NearAscending::new(p, true).unwrap();
        let _ = near.intervals();

        near.report_found(LocalDocumentId(1), &Coordinate::new(0.1, 0.1));
        near.report_found(LocalDocumentId(2), &Coordinate::new(0.7, 0.0));

        let mut yielded = Vec::new();
        while !near.is_done() {
            yielded.extend(drain(&mut near));
            if near.is_done() {
                break;
            }
            let _ = near.intervals();
        }
        let ids: Vec<_> = yielded.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_scanned_region_covers_the_annulus_when_done() {
        let mut p = params(Coordinate::new(20.0, 30.0));
        p.min_distance = 100_000.0;
        p.max_distance = 2_000_000.0;
        let mut near = NearAscending::new(p, true).unwrap();
        while !near.is_done() {
            let _ = near.intervals();
        }

        // every leaf cell holding a point inside the bounds was handed out
        for (lat, lng) in [(20.0, 31.0), (25.0, 30.0), (20.0, 45.0), (10.0, 30.0)] {
            let c = Coordinate::new(lat, lng);
            let meters = Coordinate::new(20.0, 30.0).angle_to(&c) * EARTH_RADIUS_METERS;
            assert!((100_000.0..=2_000_000.0).contains(&meters));
            let leaf = covering::cell_for_point(&c).unwrap();
            assert!(near.scanned.covers(leaf));
        }
    }

    #[test]
    fn test_custom_cover_levels() {
        let mut p = params(Coordinate::new(0.0, 0.0));
        p.cover = CoverParams {
            worst_indexed_level: 6,
            best_indexed_level: 20,
            max_cells: 20,
        };
        let mut near = NearAscending::new(p, true).unwrap();
        let intervals = near.intervals();
        assert!(!intervals.is_empty());
    }
}
