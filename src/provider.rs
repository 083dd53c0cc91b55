//! Storage abstraction and query driver.
//!
//! The engine itself never touches storage: it emits cell-id intervals and
//! expects the documents found in them to be reported back. The
//! [`CellRangeProvider`] trait is that seam, and [`NearResults`] is the
//! loop that drives an engine against a provider, yielding documents as a
//! lazy iterator.
//!
//! [`MemoryPointIndex`] is the embedded reference provider: a sorted map
//! from leaf cell id to document ids, suitable for tests, benchmarks and
//! small in-process indexes.

use crate::covering::{self, Interval};
use crate::error::Result;
use crate::geometry::{Coordinate, Document, LocalDocumentId};
use crate::near::{NearSearch, SortOrder};
use rustc_hash::FxHashMap;
use s2::cellid::CellID;
use std::collections::BTreeMap;

/// Resolves cell-id intervals to documents.
///
/// Implemented by the storage engine. `scan` must return every document
/// whose index cell lies inside the closed interval; `centroid` resolves a
/// document id to its indexed centroid. A document whose centroid cannot be
/// resolved is treated as if it had never been reported.
pub trait CellRangeProvider {
    /// All `(cell, id)` pairs whose cell lies in `interval`.
    fn scan(&self, interval: &Interval) -> Vec<(CellID, LocalDocumentId)>;

    /// Centroid of an indexed document.
    fn centroid(&self, id: LocalDocumentId) -> Option<Coordinate>;
}

/// In-memory point index keyed by leaf cell id.
///
/// Each point is indexed under the leaf cell containing its centroid.
/// Multiple documents may share a cell.
#[derive(Debug, Default)]
pub struct MemoryPointIndex {
    cells: BTreeMap<u64, Vec<LocalDocumentId>>,
    centroids: FxHashMap<LocalDocumentId, Coordinate>,
}

impl MemoryPointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Index a point document. Re-inserting an id moves it.
    pub fn insert(&mut self, id: LocalDocumentId, centroid: Coordinate) -> Result<()> {
        let cell = covering::cell_for_point(&centroid)?;
        if let Some(old) = self.centroids.insert(id, centroid) {
            self.remove_from_cell(id, &old);
        }
        self.cells.entry(cell.0).or_default().push(id);
        Ok(())
    }

    /// Drop a document from the index.
    pub fn remove(&mut self, id: LocalDocumentId) {
        if let Some(centroid) = self.centroids.remove(&id) {
            self.remove_from_cell(id, &centroid);
        }
    }

    fn remove_from_cell(&mut self, id: LocalDocumentId, centroid: &Coordinate) {
        if let Ok(cell) = covering::cell_for_point(centroid) {
            if let Some(ids) = self.cells.get_mut(&cell.0) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.cells.remove(&cell.0);
                }
            }
        }
    }
}

impl CellRangeProvider for MemoryPointIndex {
    fn scan(&self, interval: &Interval) -> Vec<(CellID, LocalDocumentId)> {
        self.cells
            .range(interval.min.0..=interval.max.0)
            .flat_map(|(cell, ids)| ids.iter().map(move |id| (CellID(*cell), *id)))
            .collect()
    }

    fn centroid(&self, id: LocalDocumentId) -> Option<Coordinate> {
        self.centroids.get(&id).copied()
    }
}

/// Iterator driving a [`NearSearch`] against a [`CellRangeProvider`].
///
/// Yields documents in the engine's sort order until the search is
/// exhausted. The sequence is finite and restartable: after
/// [`NearSearch::reset`] a new `NearResults` replays the query.
pub struct NearResults<'a, O: SortOrder, P: CellRangeProvider> {
    near: &'a mut NearSearch<O>,
    provider: &'a P,
}

impl<'a, O: SortOrder, P: CellRangeProvider> NearResults<'a, O, P> {
    pub fn new(near: &'a mut NearSearch<O>, provider: &'a P) -> Self {
        Self { near, provider }
    }
}

impl<O: SortOrder, P: CellRangeProvider> Iterator for NearResults<'_, O, P> {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        loop {
            if self.near.has_nearest() {
                return self.near.pop_nearest();
            }
            if self.near.is_done() {
                return None;
            }
            for interval in self.near.intervals() {
                for (cell, id) in self.provider.scan(&interval) {
                    debug_assert!(interval.contains(cell));
                    if let Some(centroid) = self.provider.centroid(id) {
                        self.near.report_found(id, &centroid);
                    }
                }
            }
        }
    }
}

impl<O: SortOrder> NearSearch<O> {
    /// Drive this search against a provider, yielding documents lazily.
    pub fn stream<'a, P: CellRangeProvider>(
        &'a mut self,
        provider: &'a P,
    ) -> NearResults<'a, O, P> {
        NearResults::new(self, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryParams;
    use crate::near::{NearAscending, NearDescending};

    fn index_of(points: &[(u64, f64, f64)]) -> MemoryPointIndex {
        let mut index = MemoryPointIndex::new();
        for (id, lat, lng) in points {
            index
                .insert(LocalDocumentId(*id), Coordinate::new(*lat, *lng))
                .unwrap();
        }
        index
    }

    #[test]
    fn test_memory_index_scan_is_inclusive() {
        let index = index_of(&[(1, 10.0, 10.0)]);
        let cell = covering::cell_for_point(&Coordinate::new(10.0, 10.0)).unwrap();

        let hits = index.scan(&Interval::new(cell, cell));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, LocalDocumentId(1));

        let misses = index.scan(&Interval::new(CellID(cell.0 + 1), CellID(cell.0 + 2)));
        assert!(misses.is_empty());
    }

    #[test]
    fn test_memory_index_insert_remove() {
        let mut index = index_of(&[(1, 0.0, 0.0), (2, 0.0, 0.0)]);
        assert_eq!(index.len(), 2);

        index.remove(LocalDocumentId(1));
        assert_eq!(index.len(), 1);
        assert!(index.centroid(LocalDocumentId(1)).is_none());
        assert!(index.centroid(LocalDocumentId(2)).is_some());

        // invalid coordinates are refused
        assert!(index
            .insert(LocalDocumentId(3), Coordinate::new(95.0, 0.0))
            .is_err());
    }

    #[test]
    fn test_stream_yields_sorted_results() {
        let index = index_of(&[
            (1, 0.0, 3.0),
            (2, 0.0, 1.0),
            (3, 0.0, 2.0),
            (4, 50.0, 50.0),
        ]);

        let mut near =
            NearAscending::new(QueryParams::new(Coordinate::new(0.0, 0.0)), true).unwrap();
        let docs: Vec<Document> = near.stream(&index).collect();

        let ids: Vec<u64> = docs.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
        assert!(docs.windows(2).all(|w| w[0].dist_rad <= w[1].dist_rad));
    }

    #[test]
    fn test_stream_descending() {
        let index = index_of(&[(1, 0.0, 1.0), (2, 0.0, 10.0), (3, 0.0, 100.0)]);

        let mut params = QueryParams::new(Coordinate::new(0.0, 0.0));
        params.ascending = false;
        let mut near = NearDescending::new(params, true).unwrap();
        let docs: Vec<Document> = near.stream(&index).collect();

        let ids: Vec<u64> = docs.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(docs.windows(2).all(|w| w[0].dist_rad >= w[1].dist_rad));
    }

    #[test]
    fn test_stream_is_restartable() {
        let index = index_of(&[(1, 1.0, 1.0), (2, -2.0, 3.0), (3, 4.0, -1.0)]);

        let mut near =
            NearAscending::new(QueryParams::new(Coordinate::new(0.0, 0.0)), true).unwrap();
        let first: Vec<u64> = near.stream(&index).map(|d| d.id.0).collect();
        assert_eq!(first.len(), 3);

        near.reset();
        let second: Vec<u64> = near.stream(&index).map(|d| d.id.0).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_index_finishes() {
        let index = MemoryPointIndex::new();
        let mut near =
            NearAscending::new(QueryParams::new(Coordinate::new(30.0, -120.0)), true).unwrap();
        assert_eq!(near.stream(&index).count(), 0);
        assert!(near.is_done());
    }
}
