//! Streaming k-nearest-neighbour search over an S2 point index.
//!
//! Given an origin, distance bounds and a sort direction, [`NearSearch`]
//! drives a storage-engine-agnostic scan that yields documents in strict
//! distance order while minimising the area of the sphere that must be
//! examined. The sphere is swept in concentric annuli whose width adapts to
//! the observed point density; a bounded priority buffer releases a result
//! only once no unscanned region could hold a better one.
//!
//! ```text
//!            ┌──────────────────────┐
//!  caller →  │  NearSearch<Order>   │  ← configuration (QueryParams)
//!            │  (the core)          │
//!            └─────────┬────────────┘
//!                      │ intervals()       ↑ report_found()
//!                      ▼                   │
//!            ┌──────────────────────┐      │
//!            │ CellRangeProvider    │──────┘
//!            │ (external storage)   │
//!            └──────────────────────┘
//! ```
//!
//! The storage engine resolves cell-id intervals to documents; the
//! expansion strategy, ordered buffering, de-duplication, filter gating and
//! scanned-cell tracking live here. They compose so that the emitted
//! sequence is monotone in distance, complete within the configured bounds
//! and free of duplicates, regardless of how the storage engine batches its
//! cell reads.
//!
//! # Example
//!
//! ```
//! use geonear::{Coordinate, LocalDocumentId, MemoryPointIndex, NearAscending, QueryParams};
//!
//! let mut index = MemoryPointIndex::new();
//! index.insert(LocalDocumentId(1), Coordinate::new(48.8566, 2.3522))?; // Paris
//! index.insert(LocalDocumentId(2), Coordinate::new(50.8503, 4.3517))?; // Brussels
//! index.insert(LocalDocumentId(3), Coordinate::new(41.9028, 12.4964))?; // Rome
//!
//! let params = QueryParams::new(Coordinate::new(47.0, 3.0));
//! let mut near = NearAscending::new(params, true)?;
//! let ids: Vec<_> = near.stream(&index).map(|doc| doc.id).collect();
//! assert_eq!(ids.len(), 3);
//! # Ok::<(), geonear::GeoError>(())
//! ```
//!
//! # Modules
//!
//! - [`config`]: query parameters and cover configuration
//! - [`covering`]: cell coverings, scan intervals, scanned-cell tracking
//! - [`geojson`]: GeoJSON filter-shape parsing (RFC 7946 subset)
//! - [`geometry`]: coordinates, document ids, unit-sphere helpers
//! - [`provider`]: storage abstraction and query driver
//! - [`shape`]: filter regions (`contains` / `may_intersect`)
//! - [`error`]: error types

pub mod config;
pub mod covering;
pub mod error;
pub mod geojson;
pub mod geometry;
mod near;
pub mod provider;
pub mod shape;

pub use config::{CoverParams, FilterType, QueryParams};
pub use covering::{scan_intervals, Interval};
pub use error::{GeoError, Result};
pub use geometry::{
    Coordinate, Document, LocalDocumentId, EARTH_RADIUS_METERS, MAX_RADIANS_BETWEEN_POINTS,
};
pub use near::{Ascending, Descending, NearAscending, NearDescending, NearSearch, SortOrder};
pub use provider::{CellRangeProvider, MemoryPointIndex, NearResults};
pub use shape::{BBox, ShapeContainer, ShapeKind};
