//! Marker visibility: year window, period facet and group facet.
//!
//! Everything here is pure. The caller owns the `FilterState` and asks
//! the engine, per record or per batch, whether a marker should be shown.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::period::{Period, UNKNOWN_PERIOD};
use crate::{FilterState, SiteRecord};

/// Facet value standing for "no value recorded". A site without a group
/// only passes a non-empty group selection that contains this sentinel.
pub const NONE_FACET: &str = "(none)";

// ── Configuration ────────────────────────────────────────────────────────

/// How the year slider is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderMode {
    /// Dual slider: show sites whose dates overlap `[min, max]`.
    #[default]
    Range,
    /// Single slider: show everything dated at or before `max`.
    Cutoff,
}

/// What to do with sites that carry no temporal data at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndatedPolicy {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub slider_mode: SliderMode,
    pub treat_undated_as: UndatedPolicy,
}

/// Swap the bounds if the max handle was dragged below the min handle.
pub fn normalize_range(min_year: f64, max_year: f64) -> (f64, f64) {
    if min_year > max_year {
        (max_year, min_year)
    } else {
        (min_year, max_year)
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|y| y.is_finite())
}

// ── Engine ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteFilterEngine {
    pub config: FilterConfig,
}

impl SiteFilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// The explicit period label if present, otherwise the period of
    /// the site's single year, otherwise "Unknown".
    pub fn derive_period(record: &SiteRecord) -> &str {
        if let Some(p) = record.period.as_deref().filter(|p| !p.is_empty()) {
            return p;
        }
        record
            .year
            .and_then(Period::from_year)
            .map_or(UNKNOWN_PERIOD, |p| p.as_str())
    }

    /// Temporal match, first applicable rule wins:
    /// start+end overlap, then mid-year containment, then the
    /// single-year cutoff `year <= max`, then the undated policy.
    pub fn matches_year(&self, record: &SiteRecord, min_year: f64, max_year: f64) -> bool {
        if let (Some(start), Some(end)) = (finite(record.start_year), finite(record.end_year)) {
            return end >= min_year && start <= max_year;
        }
        if let Some(mid) = finite(record.mid_year) {
            return mid >= min_year && mid <= max_year;
        }
        if let Some(year) = finite(record.year) {
            return year <= max_year;
        }
        self.config.treat_undated_as == UndatedPolicy::Visible
    }

    pub fn matches_facet(value: Option<&str>, active: &BTreeSet<String>) -> bool {
        if active.is_empty() {
            return true;
        }
        active.contains(value.unwrap_or(NONE_FACET))
    }

    /// The year window the slider mode makes of the state's bounds.
    pub fn window(&self, state: &FilterState) -> (f64, f64) {
        match self.config.slider_mode {
            SliderMode::Range => (state.min_year, state.max_year),
            SliderMode::Cutoff => (f64::NEG_INFINITY, state.max_year),
        }
    }

    pub fn evaluate(&self, record: &SiteRecord, state: &FilterState) -> bool {
        let (min_year, max_year) = self.window(state);
        self.matches_year(record, min_year, max_year)
            && Self::matches_facet(Some(Self::derive_period(record)), &state.active_periods)
            && Self::matches_facet(record.group.as_deref(), &state.active_groups)
    }

    /// Visibility of every record, in order.
    pub fn visible<'a, I>(&self, records: I, state: &FilterState) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a SiteRecord>,
    {
        records
            .into_iter()
            .map(|r| self.evaluate(r, state))
            .collect()
    }

    pub fn visible_indices(&self, records: &[SiteRecord], state: &FilterState) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.evaluate(r, state))
            .map(|(i, _)| i)
            .collect()
    }
}

// ── Visibility diff ──────────────────────────────────────────────────────

/// Markers whose visibility changed between two batch evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityDiff {
    pub shown: Vec<usize>,
    pub hidden: Vec<usize>,
}

impl VisibilityDiff {
    /// Compare two visibility vectors. Indices past the end of `previous`
    /// count as previously hidden; indices past the end of `current` are
    /// ignored.
    pub fn between(previous: &[bool], current: &[bool]) -> Self {
        let mut diff = Self::default();
        for (i, &now) in current.iter().enumerate() {
            let before = previous.get(i).copied().unwrap_or(false);
            match (before, now) {
                (false, true) => diff.shown.push(i),
                (true, false) => diff.hidden.push(i),
                _ => {}
            }
        }
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(year: f64) -> SiteRecord {
        SiteRecord {
            year: Some(year),
            ..SiteRecord::default()
        }
    }

    fn spanning(start: f64, end: f64) -> SiteRecord {
        SiteRecord {
            start_year: Some(start),
            end_year: Some(end),
            ..SiteRecord::default()
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    // ── derive_period ──

    #[test]
    fn derive_period_from_year() {
        for y in [-2501.0, -3000.0, -10_000.0] {
            assert_eq!(SiteFilterEngine::derive_period(&dated(y)), "Prehistoric");
        }
        assert_eq!(SiteFilterEngine::derive_period(&dated(-2500.0)), "Bronze Age");
        assert_eq!(SiteFilterEngine::derive_period(&dated(1268.0)), "Medieval");
        assert_eq!(SiteFilterEngine::derive_period(&dated(1800.0)), "Post-Medieval");
    }

    #[test]
    fn explicit_period_wins_over_year() {
        let mut site = dated(-3000.0);
        site.period = Some("Roman".to_string());
        assert_eq!(SiteFilterEngine::derive_period(&site), "Roman");

        site.period = Some("Victorian".to_string());
        site.year = None;
        assert_eq!(SiteFilterEngine::derive_period(&site), "Victorian");
    }

    #[test]
    fn empty_period_falls_back_to_year() {
        let mut site = dated(100.0);
        site.period = Some(String::new());
        assert_eq!(SiteFilterEngine::derive_period(&site), "Roman");
    }

    #[test]
    fn derive_period_unknown() {
        assert_eq!(SiteFilterEngine::derive_period(&SiteRecord::default()), "Unknown");
        assert_eq!(SiteFilterEngine::derive_period(&dated(f64::NAN)), "Unknown");
        assert_eq!(SiteFilterEngine::derive_period(&dated(f64::INFINITY)), "Unknown");
    }

    // ── matches_year ──

    #[test]
    fn range_overlap_not_containment() {
        let engine = SiteFilterEngine::default();
        let site = spanning(1066.0, 1200.0);
        assert!(engine.matches_year(&site, 1150.0, 1300.0));
        assert!(engine.matches_year(&site, 1000.0, 1066.0));
        assert!(engine.matches_year(&site, 1200.0, 1200.0));
        assert!(!engine.matches_year(&site, 1300.0, 1400.0));
        assert!(!engine.matches_year(&site, 900.0, 1065.0));
    }

    #[test]
    fn mid_year_is_inclusive() {
        let engine = SiteFilterEngine::default();
        let site = SiteRecord {
            mid_year: Some(1200.0),
            ..SiteRecord::default()
        };
        assert!(engine.matches_year(&site, 1200.0, 1300.0));
        assert!(engine.matches_year(&site, 1100.0, 1200.0));
        assert!(!engine.matches_year(&site, 1201.0, 1300.0));
    }

    #[test]
    fn range_takes_precedence_over_mid_and_year() {
        let engine = SiteFilterEngine::default();
        let site = SiteRecord {
            start_year: Some(1268.0),
            end_year: Some(1271.0),
            mid_year: Some(500.0),
            year: Some(500.0),
            ..SiteRecord::default()
        };
        assert!(!engine.matches_year(&site, 400.0, 600.0));
        assert!(engine.matches_year(&site, 1270.0, 1280.0));
    }

    #[test]
    fn half_range_falls_through_to_mid_year() {
        let engine = SiteFilterEngine::default();
        let site = SiteRecord {
            start_year: Some(1268.0),
            mid_year: Some(900.0),
            ..SiteRecord::default()
        };
        assert!(engine.matches_year(&site, 800.0, 1000.0));
        assert!(!engine.matches_year(&site, 1200.0, 1300.0));
    }

    #[test]
    fn single_year_is_an_upper_cutoff() {
        let engine = SiteFilterEngine::default();
        assert!(engine.matches_year(&dated(1800.0), f64::NEG_INFINITY, 1900.0));
        assert!(engine.matches_year(&dated(1800.0), 1850.0, 1900.0));
        assert!(engine.matches_year(&dated(1900.0), 0.0, 1900.0));
        assert!(!engine.matches_year(&dated(1950.0), f64::NEG_INFINITY, 1900.0));
    }

    #[test]
    fn undated_policy() {
        let undated = SiteRecord::named("Somewhere");
        let visible = SiteFilterEngine::default();
        assert!(visible.matches_year(&undated, 0.0, 10.0));

        let hidden = SiteFilterEngine::new(FilterConfig {
            treat_undated_as: UndatedPolicy::Hidden,
            ..FilterConfig::default()
        });
        assert!(!hidden.matches_year(&undated, 0.0, 10.0));
        assert!(!hidden.matches_year(&dated(f64::NAN), 0.0, 10.0));
    }

    // ── matches_facet ──

    #[test]
    fn facet_matching() {
        assert!(SiteFilterEngine::matches_facet(Some("Roman"), &set(&[])));
        assert!(!SiteFilterEngine::matches_facet(Some("Roman"), &set(&["Medieval"])));
        assert!(SiteFilterEngine::matches_facet(Some("Roman"), &set(&["Medieval", "Roman"])));
        assert!(SiteFilterEngine::matches_facet(None, &set(&[])));
    }

    #[test]
    fn missing_value_needs_the_sentinel() {
        assert!(!SiteFilterEngine::matches_facet(None, &set(&["Settlement"])));
        assert!(SiteFilterEngine::matches_facet(None, &set(&[NONE_FACET])));
        assert!(!SiteFilterEngine::matches_facet(Some(""), &set(&[NONE_FACET])));
    }

    // ── normalize_range ──

    #[test]
    fn normalize_swaps_inverted_bounds() {
        assert_eq!(normalize_range(1900.0, 1066.0), (1066.0, 1900.0));
        assert_eq!(normalize_range(1066.0, 1900.0), (1066.0, 1900.0));
        assert_eq!(normalize_range(43.0, 43.0), (43.0, 43.0));
    }

    // ── evaluate ──

    #[test]
    fn evaluate_end_to_end() {
        let engine = SiteFilterEngine::default();
        let castle = SiteRecord {
            group: Some("Fortification".to_string()),
            start_year: Some(1268.0),
            end_year: Some(1271.0),
            ..SiteRecord::named("Caerphilly Castle")
        };

        let mut state = FilterState::new(1200.0, 1300.0).with_groups(["Fortification"]);
        assert!(engine.evaluate(&castle, &state));

        state.active_groups = set(&["Settlement"]);
        assert!(!engine.evaluate(&castle, &state));
    }

    #[test]
    fn evaluate_filters_on_derived_period() {
        let engine = SiteFilterEngine::default();
        let fort = SiteRecord {
            year: Some(80.0),
            ..SiteRecord::named("Segontium")
        };
        let state = FilterState::new(0.0, 500.0).with_periods(["Roman"]);
        assert!(engine.evaluate(&fort, &state));

        let state = state.with_periods(["Iron Age"]);
        assert!(!engine.evaluate(&fort, &state));

        let undated = SiteRecord::named("Somewhere");
        let state = FilterState::new(0.0, 500.0).with_periods([UNKNOWN_PERIOD]);
        assert!(engine.evaluate(&undated, &state));
    }

    #[test]
    fn cutoff_mode_ignores_the_min_handle() {
        let engine = SiteFilterEngine::new(FilterConfig {
            slider_mode: SliderMode::Cutoff,
            ..FilterConfig::default()
        });
        let state = FilterState::new(1850.0, 1900.0);

        assert!(engine.evaluate(&dated(1800.0), &state));
        assert!(!engine.evaluate(&dated(1950.0), &state));
        assert!(engine.evaluate(&spanning(1066.0, 1200.0), &state));
        assert!(!engine.evaluate(&spanning(1901.0, 1950.0), &state));

        let range = SiteFilterEngine::default();
        assert!(!range.evaluate(&spanning(1066.0, 1200.0), &state));
    }

    #[test]
    fn cutoff_below_the_hidden_min_handle() {
        let engine = SiteFilterEngine::new(FilterConfig {
            slider_mode: SliderMode::Cutoff,
            ..FilterConfig::default()
        });
        // From handle left at 1500 in range mode, then "built by" dragged to 1100
        let mut state = FilterState::new(43.0, 2000.0);
        state.set_range(1500.0, 2000.0);
        state.set_cutoff(1100.0);

        assert_eq!(state.max_year, 1100.0);
        assert!(!engine.evaluate(&dated(1300.0), &state));
        assert!(engine.evaluate(&dated(1000.0), &state));
        assert!(!engine.evaluate(&spanning(1268.0, 1271.0), &state));
    }

    #[test]
    fn is_dated_agrees_with_the_undated_policy() {
        let hidden = SiteFilterEngine::new(FilterConfig {
            treat_undated_as: UndatedPolicy::Hidden,
            ..FilterConfig::default()
        });
        let state = FilterState::new(f64::MIN, f64::MAX);
        let half = SiteRecord {
            start_year: Some(1268.0),
            ..SiteRecord::default()
        };
        for site in [half, dated(1800.0), spanning(1268.0, 1271.0), dated(f64::NAN)] {
            assert_eq!(site.is_dated(), hidden.evaluate(&site, &state), "{site:?}");
        }
    }

    // ── batches ──

    #[test]
    fn batch_evaluation_and_diff() {
        let engine = SiteFilterEngine::default();
        let sites = vec![
            spanning(1066.0, 1200.0),
            dated(1950.0),
            SiteRecord::named("Undated"),
        ];

        let before = engine.visible(&sites, &FilterState::new(1000.0, 1100.0));
        assert_eq!(before, vec![true, false, true]);

        let after = engine.visible(&sites, &FilterState::new(1300.0, 2000.0));
        assert_eq!(after, vec![false, true, true]);
        assert_eq!(
            engine.visible_indices(&sites, &FilterState::new(1300.0, 2000.0)),
            vec![1, 2]
        );

        let diff = VisibilityDiff::between(&before, &after);
        assert_eq!(diff.shown, vec![1]);
        assert_eq!(diff.hidden, vec![0]);
        assert!(VisibilityDiff::between(&after, &after).is_empty());
    }

    #[test]
    fn diff_against_nothing_shows_all_visible() {
        let diff = VisibilityDiff::between(&[], &[true, false, true]);
        assert_eq!(diff.shown, vec![0, 2]);
        assert!(diff.hidden.is_empty());
    }

    #[test]
    fn config_reads_lowercase_names() {
        let config: FilterConfig =
            serde_json::from_str(r#"{"slider_mode":"cutoff","treat_undated_as":"hidden"}"#)
                .unwrap();
        assert_eq!(config.slider_mode, SliderMode::Cutoff);
        assert_eq!(config.treat_undated_as, UndatedPolicy::Hidden);

        let config: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());
    }
}
