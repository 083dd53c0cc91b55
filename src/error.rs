//! Error types for near-search queries.

use thiserror::Error;

/// Errors surfaced to callers at the query boundary.
///
/// State-machine misuse inside [`crate::NearSearch`] (calling `intervals()`
/// while a result is releasable, for example) is a programming error and is
/// enforced with `debug_assert!` rather than an error variant.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Invalid input: bad coordinate, unclosed loop, inverted bounds,
    /// malformed GeoJSON, inconsistent query configuration.
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    /// GeoJSON geometry kinds the engine does not support.
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Result type for near-search operations.
pub type Result<T> = std::result::Result<T, GeoError>;
