//! Filtering and ordering of resolved beatmaps

use super::{FilterSpec, SortKey};
use crate::beatmap::ResolvedBeatmap;

/// Applies range filters and the optional sort key to resolved beatmaps.
///
/// Pure transformation: no network, no filesystem, no shared state.
pub struct FilterSortEngine;

impl FilterSortEngine {
    /// Check a single beatmap against every filter (conjunction)
    pub fn matches(beatmap: &ResolvedBeatmap, filters: &[FilterSpec]) -> bool {
        filters.iter().all(|f| f.matches(beatmap))
    }

    /// Produce the final ordered sequence: filter, then sort if requested.
    ///
    /// Without a sort key the incoming order is preserved verbatim.
    pub fn apply(
        beatmaps: Vec<ResolvedBeatmap>,
        filters: &[FilterSpec],
        sort: Option<SortKey>,
    ) -> Vec<ResolvedBeatmap> {
        let mut kept: Vec<ResolvedBeatmap> = beatmaps
            .into_iter()
            .filter(|b| Self::matches(b, filters))
            .collect();
        if let Some(key) = sort {
            Self::sort(&mut kept, key);
        }
        kept
    }

    /// Ascending sort on `key`, ties broken by content hash so equal-valued
    /// runs always serialize in the same order.
    pub fn sort(beatmaps: &mut [ResolvedBeatmap], key: SortKey) {
        beatmaps.sort_by(|a, b| {
            let by_key = match key {
                SortKey::StarRating => a.star_rating.total_cmp(&b.star_rating),
                SortKey::Bpm => a.bpm.total_cmp(&b.bpm),
                SortKey::Title => a.title.cmp(&b.title),
            };
            by_key.then_with(|| a.content_hash.cmp(&b.content_hash))
        });
    }

    /// How many beatmaps would pass the filters
    pub fn count_matching(beatmaps: &[ResolvedBeatmap], filters: &[FilterSpec]) -> usize {
        beatmaps.iter().filter(|b| Self::matches(b, filters)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Metric;

    fn beatmap(hash: &str, stars: f32, bpm: f64, title: &str) -> ResolvedBeatmap {
        ResolvedBeatmap {
            content_hash: hash.to_string(),
            beatmap_id: 1,
            set_id: 1,
            star_rating: stars,
            bpm,
            title: title.to_string(),
        }
    }

    fn star_spread() -> Vec<ResolvedBeatmap> {
        vec![
            beatmap("a1", 3.9, 140.0, "Low"),
            beatmap("a2", 4.0, 150.0, "AtMin"),
            beatmap("a3", 5.0, 160.0, "Mid"),
            beatmap("a4", 6.0, 170.0, "AtMax"),
            beatmap("a5", 6.1, 180.0, "High"),
        ]
    }

    #[test]
    fn exclusive_star_range_keeps_strict_interior() {
        let filters = [FilterSpec::new(Metric::StarRating, 4.0, 6.0)];
        let kept = FilterSortEngine::apply(star_spread(), &filters, None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Mid");
    }

    #[test]
    fn no_filters_keeps_everything_in_order() {
        let kept = FilterSortEngine::apply(star_spread(), &[], None);
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[0].title, "Low");
        assert_eq!(kept[4].title, "High");
    }

    #[test]
    fn filters_combine_as_conjunction() {
        let filters = [
            FilterSpec::new(Metric::StarRating, 3.0, 7.0),
            FilterSpec::new(Metric::Bpm, 145.0, 175.0),
        ];
        let kept = FilterSortEngine::apply(star_spread(), &filters, None);
        // The star range admits all five; the BPM range trims both ends.
        let titles: Vec<&str> = kept.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["AtMin", "Mid", "AtMax"]);
    }

    #[test]
    fn sorts_by_star_rating_ascending() {
        let mut maps = vec![
            beatmap("c", 6.0, 100.0, "C"),
            beatmap("a", 4.0, 100.0, "A"),
            beatmap("b", 5.0, 100.0, "B"),
        ];
        FilterSortEngine::sort(&mut maps, SortKey::StarRating);
        let titles: Vec<&str> = maps.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn sorts_by_title() {
        let mut maps = vec![
            beatmap("1", 1.0, 100.0, "Zebra"),
            beatmap("2", 2.0, 100.0, "Apple"),
            beatmap("3", 3.0, 100.0, "Mango"),
        ];
        FilterSortEngine::sort(&mut maps, SortKey::Title);
        let titles: Vec<&str> = maps.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "Mango", "Zebra"]);
    }

    #[test]
    fn equal_keys_tie_break_on_content_hash() {
        let mut maps = vec![
            beatmap("zzz", 5.0, 100.0, "First"),
            beatmap("aaa", 5.0, 100.0, "Second"),
            beatmap("mmm", 5.0, 100.0, "Third"),
        ];
        FilterSortEngine::sort(&mut maps, SortKey::StarRating);
        let hashes: Vec<&str> = maps.iter().map(|b| b.content_hash.as_str()).collect();
        assert_eq!(hashes, vec!["aaa", "mmm", "zzz"]);
    }

    #[test]
    fn count_matching_reports_survivors() {
        let filters = [FilterSpec::new(Metric::Bpm, 0.0, 165.0)];
        assert_eq!(FilterSortEngine::count_matching(&star_spread(), &filters), 3);
    }
}
