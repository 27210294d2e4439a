//! Data models for assembled collections

use serde::{Deserialize, Serialize};

use crate::beatmap::ResolvedBeatmap;

/// A named, ordered group of resolved beatmaps, the unit of output.
///
/// No two members share a content hash; the resolver enforces this before
/// a collection is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    /// Name of the collection
    pub name: String,
    /// Member beatmaps in final order
    pub beatmaps: Vec<ResolvedBeatmap>,
}

impl Collection {
    /// Create a collection with the given name and members
    pub fn new(name: impl Into<String>, beatmaps: Vec<ResolvedBeatmap>) -> Self {
        Self {
            name: name.into(),
            beatmaps,
        }
    }

    /// Number of beatmaps in this collection
    pub fn len(&self) -> usize {
        self.beatmaps.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.beatmaps.is_empty()
    }

    /// Content hashes of the members, in collection order
    pub fn hashes(&self) -> impl Iterator<Item = &str> + '_ {
        self.beatmaps.iter().map(|b| b.content_hash.as_str())
    }
}

/// A collection as stored on disk: a name plus member hashes.
///
/// The binary format does not carry full metadata, so reading a file back
/// yields this reduced form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCollection {
    /// Name of the collection
    pub name: String,
    /// MD5 content hashes of member beatmaps
    pub beatmap_hashes: Vec<String>,
}

impl StoredCollection {
    /// Create a stored collection from a name and hash list
    pub fn with_hashes(name: impl Into<String>, beatmap_hashes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            beatmap_hashes,
        }
    }

    /// Number of beatmap hashes
    pub fn len(&self) -> usize {
        self.beatmap_hashes.len()
    }

    /// Check if the stored collection is empty
    pub fn is_empty(&self) -> bool {
        self.beatmap_hashes.is_empty()
    }
}
