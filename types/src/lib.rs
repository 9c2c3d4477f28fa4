//! Shared site model and filter engine.
//!
//! Used by the `site_map` CLI (loading, export, summaries) and by the
//! browser frontend, so both decide marker visibility the same way.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod filter;
pub mod period;

pub use filter::{
    FilterConfig, NONE_FACET, SiteFilterEngine, SliderMode, UndatedPolicy, VisibilityDiff,
    normalize_range,
};
pub use period::{PERIOD_TABLE, Period, UNKNOWN_PERIOD};

pub const UNNAMED_SITE: &str = "Unnamed site";

/// Format a year for display, with BC for negative values.
pub fn format_year(year: f64) -> String {
    if year < 0.0 {
        format!("{} BC", -year)
    } else {
        format!("{year}")
    }
}

fn unnamed() -> String {
    UNNAMED_SITE.to_string()
}

// ── Site record ──────────────────────────────────────────────────────────

/// One historic site, as extracted from a feature's properties.
///
/// Temporal fields are tried in the order `start_year`+`end_year`,
/// `mid_year`, `year`; any of them may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    #[serde(default = "unnamed")]
    pub name: String,
    /// Coarse category, e.g. "Fortification"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub site_type: Option<String>,
    /// Explicit era label from the source data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid_year: Option<f64>,
    /// [longitude, latitude]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,
}

impl Default for SiteRecord {
    fn default() -> Self {
        Self {
            name: unnamed(),
            group: None,
            site_type: None,
            period: None,
            year: None,
            start_year: None,
            end_year: None,
            mid_year: None,
            coordinates: None,
        }
    }
}

impl SiteRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The years the filter reads for this site, as `(earliest, latest)`.
    ///
    /// Same precedence as the year match: a full start/end pair, then
    /// `mid_year`, then `year`. A lone start or end year is not enough.
    pub fn year_span(&self) -> Option<(f64, f64)> {
        let finite = |v: Option<f64>| v.filter(|y| y.is_finite());
        if let (Some(start), Some(end)) = (finite(self.start_year), finite(self.end_year)) {
            return Some((start.min(end), start.max(end)));
        }
        finite(self.mid_year).or(finite(self.year)).map(|y| (y, y))
    }

    /// Whether the year filter can place this site at all; undated sites
    /// fall under the undated policy instead.
    pub fn is_dated(&self) -> bool {
        self.year_span().is_some()
    }

    /// Human-readable dates: "1268 → 1271", "c. 1200" or "1800".
    pub fn date_label(&self) -> Option<String> {
        let finite = |v: Option<f64>| v.filter(|y| y.is_finite());
        match (
            finite(self.start_year),
            finite(self.end_year),
            finite(self.mid_year),
            finite(self.year),
        ) {
            (Some(start), Some(end), _, _) => Some(format!("{start} → {end}")),
            (_, _, Some(mid), _) => Some(format!("c. {mid}")),
            (_, _, _, Some(year)) => Some(format!("{year}")),
            _ => None,
        }
    }
}

/// Earliest and latest year the filter can see across `records`.
pub fn year_extent<'a, I>(records: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a SiteRecord>,
{
    records
        .into_iter()
        .filter_map(SiteRecord::year_span)
        .reduce(|(lo, hi), (from, to)| (lo.min(from), hi.max(to)))
}

// ── Filter state ─────────────────────────────────────────────────────────

/// The current slider and checkbox selection, owned by the UI.
///
/// An empty facet set means "no restriction" for that facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub min_year: f64,
    pub max_year: f64,
    #[serde(default)]
    pub active_periods: BTreeSet<String>,
    #[serde(default)]
    pub active_groups: BTreeSet<String>,
}

impl FilterState {
    /// Build a state for the given bounds, swapping them if inverted.
    pub fn new(min_year: f64, max_year: f64) -> Self {
        let (min_year, max_year) = normalize_range(min_year, max_year);
        Self {
            min_year,
            max_year,
            active_periods: BTreeSet::new(),
            active_groups: BTreeSet::new(),
        }
    }

    pub fn with_periods<I, S>(mut self, periods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_periods = periods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Move both slider handles; an inverted pair is normalized.
    pub fn set_range(&mut self, min_year: f64, max_year: f64) {
        let (min_year, max_year) = normalize_range(min_year, max_year);
        self.min_year = min_year;
        self.max_year = max_year;
    }

    /// Move the single "built by" handle. The hidden min handle follows it
    /// down so the pair never swaps and `year` always lands in `max_year`.
    pub fn set_cutoff(&mut self, year: f64) {
        self.min_year = self.min_year.min(year);
        self.max_year = year;
    }

    /// The "to" handle moved. In cutoff mode it is the only handle, so the
    /// value always becomes `max_year`; in range mode the pair is normalized.
    pub fn move_max_handle(&mut self, mode: SliderMode, year: f64) {
        match mode {
            SliderMode::Cutoff => self.set_cutoff(year),
            SliderMode::Range => self.set_range(self.min_year, year),
        }
    }

    /// Returns whether the period is active after the toggle.
    pub fn toggle_period(&mut self, period: &str) -> bool {
        toggle(&mut self.active_periods, period)
    }

    /// Returns whether the group is active after the toggle.
    pub fn toggle_group(&mut self, group: &str) -> bool {
        toggle(&mut self.active_groups, group)
    }

    pub fn clear_facets(&mut self) {
        self.active_periods.clear();
        self.active_groups.clear();
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}
