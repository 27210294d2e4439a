//! Parsing and classification of beatmap identifiers
//!
//! Input lines come in two shapes: a bare numeric beatmap ID, or an osu!
//! website URL. URLs are classified at parse time so later stages only ever
//! deal with `(kind, value)` pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single identifier taken from an input source, before resolution.
///
/// Deduplication compares the kind and the numeric value together, so the
/// beatmap 55 and the beatmap set 55 are distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawIdentifier {
    /// A single beatmap (one difficulty)
    Beatmap(u64),
    /// A beatmap set, expanded into its member beatmaps during resolution
    BeatmapSet(u64),
}

impl RawIdentifier {
    /// Parse one entry of an identifier list.
    ///
    /// Accepted shapes:
    /// - a bare numeric beatmap ID: `1234`
    /// - a beatmap URL: `https://osu.ppy.sh/b/1234`, `.../beatmaps/1234`
    /// - a difficulty link inside a set: `.../beatmapsets/55#osu/1234`
    /// - a beatmap set URL: `https://osu.ppy.sh/s/55`, `.../beatmapsets/55`
    ///
    /// Returns `None` for anything else; the caller decides whether that is
    /// a warning or an error.
    pub fn parse(input: &str) -> Option<RawIdentifier> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            return input.parse().ok().map(RawIdentifier::Beatmap);
        }

        // URL form: drop the query, split off the fragment, then classify by
        // the path segment preceding the trailing number.
        let without_query = input.split('?').next().unwrap_or(input);
        let (path, fragment) = match without_query.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (without_query, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if let Some(fragment) = fragment {
            // beatmapsets/<set>#<mode>/<beatmap> links name one difficulty.
            if segments.iter().any(|s| *s == "beatmapsets") {
                if let Some((mode, id)) = fragment.split_once('/') {
                    if matches!(mode, "osu" | "taiko" | "fruits" | "mania") {
                        return id.parse().ok().map(RawIdentifier::Beatmap);
                    }
                }
            }
            return None;
        }

        let trailing = segments.last()?;
        let id: u64 = trailing.parse().ok()?;
        let kind = *segments.get(segments.len().checked_sub(2)?)?;
        match kind {
            "b" | "beatmaps" => Some(RawIdentifier::Beatmap(id)),
            "s" | "beatmapsets" => Some(RawIdentifier::BeatmapSet(id)),
            _ => None,
        }
    }

    /// The numeric part of the identifier
    pub fn value(&self) -> u64 {
        match self {
            RawIdentifier::Beatmap(id) | RawIdentifier::BeatmapSet(id) => *id,
        }
    }
}

impl fmt::Display for RawIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawIdentifier::Beatmap(id) => write!(f, "beatmap {}", id),
            RawIdentifier::BeatmapSet(id) => write!(f, "beatmapset {}", id),
        }
    }
}

/// Parse an osu!Collector collection reference: either a bare numeric ID or
/// a collection URL such as `https://osucollector.com/collections/123/name`.
pub fn parse_collection_id(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.bytes().all(|b| b.is_ascii_digit()) && !input.is_empty() {
        return input.parse().ok();
    }
    let path = input.split(['?', '#']).next().unwrap_or(input);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let position = segments.iter().position(|s| *s == "collections")?;
    segments.get(position + 1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_beatmap_id() {
        assert_eq!(RawIdentifier::parse("1234"), Some(RawIdentifier::Beatmap(1234)));
        assert_eq!(RawIdentifier::parse("  42  "), Some(RawIdentifier::Beatmap(42)));
    }

    #[test]
    fn parses_beatmap_urls() {
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/b/1234"),
            Some(RawIdentifier::Beatmap(1234))
        );
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/beatmaps/1234"),
            Some(RawIdentifier::Beatmap(1234))
        );
        assert_eq!(
            RawIdentifier::parse("https://old.ppy.sh/b/99"),
            Some(RawIdentifier::Beatmap(99))
        );
    }

    #[test]
    fn parses_beatmapset_urls() {
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/s/55"),
            Some(RawIdentifier::BeatmapSet(55))
        );
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/beatmapsets/55"),
            Some(RawIdentifier::BeatmapSet(55))
        );
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/beatmapsets/55/"),
            Some(RawIdentifier::BeatmapSet(55))
        );
    }

    #[test]
    fn difficulty_fragment_names_a_beatmap() {
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/beatmapsets/55#osu/1234"),
            Some(RawIdentifier::Beatmap(1234))
        );
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/beatmapsets/55#mania/777"),
            Some(RawIdentifier::Beatmap(777))
        );
        assert_eq!(RawIdentifier::parse("https://osu.ppy.sh/beatmapsets/55#unknown/777"), None);
    }

    #[test]
    fn query_string_is_ignored() {
        assert_eq!(
            RawIdentifier::parse("https://osu.ppy.sh/beatmaps/1234?mode=osu"),
            Some(RawIdentifier::Beatmap(1234))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(RawIdentifier::parse(""), None);
        assert_eq!(RawIdentifier::parse("notanid"), None);
        assert_eq!(RawIdentifier::parse("12a3"), None);
        assert_eq!(RawIdentifier::parse("-5"), None);
        assert_eq!(RawIdentifier::parse("https://osu.ppy.sh/users/1234"), None);
        assert_eq!(RawIdentifier::parse("https://osu.ppy.sh/beatmaps/abc"), None);
    }

    #[test]
    fn rejects_overflowing_id() {
        assert_eq!(RawIdentifier::parse("123456789012345678901234567890"), None);
    }

    #[test]
    fn beatmap_and_set_with_same_value_differ() {
        assert_ne!(RawIdentifier::Beatmap(55), RawIdentifier::BeatmapSet(55));
    }

    #[test]
    fn display_names_the_kind() {
        assert_eq!(RawIdentifier::Beatmap(1).to_string(), "beatmap 1");
        assert_eq!(RawIdentifier::BeatmapSet(2).to_string(), "beatmapset 2");
    }

    #[test]
    fn parses_collection_references() {
        assert_eq!(parse_collection_id("12345"), Some(12345));
        assert_eq!(
            parse_collection_id("https://osucollector.com/collections/123"),
            Some(123)
        );
        assert_eq!(
            parse_collection_id("https://osucollector.com/collections/123/My%20Collection"),
            Some(123)
        );
        assert_eq!(parse_collection_id("https://osucollector.com/users/9"), None);
        assert_eq!(parse_collection_id("nonsense"), None);
        assert_eq!(parse_collection_id(""), None);
    }
}
