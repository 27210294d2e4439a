//! Filter and sort definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::beatmap::ResolvedBeatmap;

/// Numeric metric a range filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    StarRating,
    Bpm,
}

impl Metric {
    /// The beatmap's value for this metric
    pub fn value_of(&self, beatmap: &ResolvedBeatmap) -> f64 {
        match self {
            Metric::StarRating => f64::from(beatmap.star_rating),
            Metric::Bpm => beatmap.bpm,
        }
    }

    /// Sort parameter name the listing service understands
    pub(crate) fn listing_sort_key(&self) -> &'static str {
        match self {
            Metric::StarRating => "difficulty_rating",
            Metric::Bpm => "bpm",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::StarRating => write!(f, "star rating"),
            Metric::Bpm => write!(f, "BPM"),
        }
    }
}

/// A numeric range filter over one metric.
///
/// A bound of `0` means unbounded on that side. Non-zero bounds are
/// exclusive: with both set, a beatmap passes iff `min < value < max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterSpec {
    pub metric: Metric,
    pub min: f64,
    pub max: f64,
}

impl FilterSpec {
    /// Create a new filter
    pub fn new(metric: Metric, min: f64, max: f64) -> Self {
        Self { metric, min, max }
    }

    /// Whether both bounds are the unbounded sentinel
    pub fn is_unbounded(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    /// Whether `beatmap` falls inside the accepted range
    pub fn matches(&self, beatmap: &ResolvedBeatmap) -> bool {
        let value = self.metric.value_of(beatmap);
        if self.min != 0.0 && value <= self.min {
            return false;
        }
        if self.max != 0.0 && value >= self.max {
            return false;
        }
        true
    }

    /// Human-readable form for summaries, e.g. `4 < star rating < 6`
    pub fn summary(&self) -> String {
        match (self.min != 0.0, self.max != 0.0) {
            (true, true) => format!("{} < {} < {}", self.min, self.metric, self.max),
            (true, false) => format!("{} > {}", self.metric, self.min),
            (false, true) => format!("{} < {}", self.metric, self.max),
            (false, false) => format!("{} unbounded", self.metric),
        }
    }
}

/// Key for ordering the final collection, always ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    StarRating,
    Bpm,
    Title,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::StarRating => write!(f, "star rating"),
            SortKey::Bpm => write!(f, "BPM"),
            SortKey::Title => write!(f, "title"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beatmap(stars: f32, bpm: f64) -> ResolvedBeatmap {
        ResolvedBeatmap {
            content_hash: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            beatmap_id: 1,
            set_id: 1,
            star_rating: stars,
            bpm,
            title: "Test".to_string(),
        }
    }

    #[test]
    fn bounds_are_exclusive() {
        let filter = FilterSpec::new(Metric::StarRating, 4.0, 6.0);
        assert!(!filter.matches(&beatmap(4.0, 180.0)));
        assert!(!filter.matches(&beatmap(6.0, 180.0)));
        assert!(filter.matches(&beatmap(4.01, 180.0)));
        assert!(filter.matches(&beatmap(5.99, 180.0)));
    }

    #[test]
    fn zero_min_is_unbounded_below() {
        let filter = FilterSpec::new(Metric::StarRating, 0.0, 6.0);
        assert!(filter.matches(&beatmap(0.5, 180.0)));
        assert!(filter.matches(&beatmap(5.99, 180.0)));
        assert!(!filter.matches(&beatmap(6.0, 180.0)));
    }

    #[test]
    fn zero_max_is_unbounded_above() {
        let filter = FilterSpec::new(Metric::StarRating, 4.0, 0.0);
        assert!(!filter.matches(&beatmap(4.0, 180.0)));
        assert!(filter.matches(&beatmap(9.5, 180.0)));
    }

    #[test]
    fn both_zero_admits_everything() {
        let filter = FilterSpec::new(Metric::Bpm, 0.0, 0.0);
        assert!(filter.is_unbounded());
        assert!(filter.matches(&beatmap(1.0, 0.0)));
        assert!(filter.matches(&beatmap(10.0, 999.0)));
    }

    #[test]
    fn bpm_filter_reads_bpm() {
        let filter = FilterSpec::new(Metric::Bpm, 170.0, 200.0);
        assert!(filter.matches(&beatmap(5.0, 180.0)));
        assert!(!filter.matches(&beatmap(5.0, 170.0)));
        assert!(!filter.matches(&beatmap(5.0, 200.0)));
        assert!(!filter.matches(&beatmap(5.0, 150.0)));
    }

    #[test]
    fn metric_value_extraction() {
        let b = beatmap(5.5, 172.0);
        assert!((Metric::StarRating.value_of(&b) - 5.5).abs() < 1e-6);
        assert!((Metric::Bpm.value_of(&b) - 172.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_forms() {
        assert_eq!(
            FilterSpec::new(Metric::StarRating, 4.0, 6.0).summary(),
            "4 < star rating < 6"
        );
        assert_eq!(FilterSpec::new(Metric::Bpm, 170.0, 0.0).summary(), "BPM > 170");
        assert_eq!(FilterSpec::new(Metric::Bpm, 0.0, 200.0).summary(), "BPM < 200");
        assert_eq!(
            FilterSpec::new(Metric::StarRating, 0.0, 0.0).summary(),
            "star rating unbounded"
        );
    }
}
