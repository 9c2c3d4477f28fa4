//! UI-side state for the site map: the loaded sites, the engine that
//! judges them and the visibility of every marker after the last filter
//! change.

use std::collections::BTreeSet;

use site_types::period::period_sort_key;
use site_types::{
    FilterConfig, FilterState, NONE_FACET, SiteFilterEngine, VisibilityDiff, year_extent,
};

use crate::types::SiteEntry;

/// Slider bounds when the data carries no dates at all.
pub const DEFAULT_BOUNDS: (f64, f64) = (-4000.0, 2025.0);

#[derive(Debug, Clone, PartialEq)]
pub struct SiteMapView {
    pub engine: SiteFilterEngine,
    pub sites: Vec<SiteEntry>,
    visibility: Vec<bool>,
}

impl SiteMapView {
    /// Everything starts hidden until the first `apply`.
    pub fn new(sites: Vec<SiteEntry>, config: FilterConfig) -> Self {
        let visibility = vec![false; sites.len()];
        Self {
            engine: SiteFilterEngine::new(config),
            sites,
            visibility,
        }
    }

    /// Re-evaluate every site and return the markers that changed.
    pub fn apply(&mut self, config: FilterConfig, state: &FilterState) -> VisibilityDiff {
        self.engine.config = config;
        let now = self
            .engine
            .visible(self.sites.iter().map(|e| &e.site), state);
        let diff = VisibilityDiff::between(&self.visibility, &now);
        self.visibility = now;
        diff
    }

    pub fn visible_sites(&self) -> impl Iterator<Item = &SiteEntry> {
        self.sites
            .iter()
            .zip(&self.visibility)
            .filter(|(_, v)| **v)
            .map(|(e, _)| e)
    }

    pub fn visible_count(&self) -> usize {
        self.visibility.iter().filter(|v| **v).count()
    }

    /// Distinct groups for the group checkboxes; "(none)" if any site lacks one.
    pub fn groups(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .sites
            .iter()
            .map(|e| e.site.group.as_deref().unwrap_or(NONE_FACET))
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Distinct derived periods, chronological.
    pub fn periods(&self) -> Vec<String> {
        let mut periods: Vec<&str> = self
            .sites
            .iter()
            .map(|e| e.derived_period.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        periods.sort_by_key(|p| period_sort_key(*p));
        periods.into_iter().map(str::to_string).collect()
    }

    /// Slider bounds covering every year in the data.
    pub fn extent(&self) -> (f64, f64) {
        year_extent(self.sites.iter().map(|e| &e.site)).unwrap_or(DEFAULT_BOUNDS)
    }
}
