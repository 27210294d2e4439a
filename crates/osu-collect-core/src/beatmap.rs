//! Resolved beatmap metadata

use serde::{Deserialize, Serialize};

/// Metadata for one beatmap as returned by the lookup API.
///
/// Identity is the content hash: two values carrying the same hash describe
/// the same beatmap, whichever identifier produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBeatmap {
    /// Stable content fingerprint (hex MD5 of the .osu file)
    pub content_hash: String,
    /// Numeric beatmap ID
    pub beatmap_id: u64,
    /// ID of the parent beatmap set
    pub set_id: u64,
    /// Star rating (difficulty)
    pub star_rating: f32,
    /// Beats per minute
    pub bpm: f64,
    /// Song title
    pub title: String,
}
