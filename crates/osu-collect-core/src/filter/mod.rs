//! Metadata filtering and ordering for resolved beatmaps
//!
//! Filters are numeric range predicates over a single metric; multiple
//! filters combine as a conjunction. Sorting is always ascending and
//! deterministic.

pub mod criteria;
pub mod engine;

pub use criteria::{FilterSpec, Metric, SortKey};
pub use engine::FilterSortEngine;
