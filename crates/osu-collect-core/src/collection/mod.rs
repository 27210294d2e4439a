//! Collection model and serialization
//!
//! Provides the in-memory collection model, writers for the osu!stable
//! collection.db binary format and a plain-text listing, and a reader for
//! existing collection.db files.

pub mod model;
pub mod reader;
pub mod writer;

pub use model::*;
pub use reader::CollectionReader;
pub use writer::{CollectionWriter, OutputFormat, DB_VERSION};
