//! Module: index
//! Responsibility: an in-process inverted index that evaluates `SearchQuery`.
//! Does not own: query construction.
//! Boundary: reference backend for the query contract; serves both as a
//! primary index and as a change-history index.

mod memory;


// re-exports
pub use memory::{Document, MemoryIndex};
