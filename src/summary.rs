//! Per-feed statistics: the data behind a legend and the `summary` command.

use std::collections::HashMap;

use serde::Serialize;
use site_types::period::period_sort_key;
use site_types::{FilterState, NONE_FACET, SiteFilterEngine, SiteRecord, year_extent};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSummary {
    pub total: usize,
    pub dated: usize,
    pub undated: usize,
    /// Derived period → count, table periods first in chronological order
    pub by_period: Vec<(String, usize)>,
    /// Group → count, most frequent first; sites without a group under "(none)"
    pub by_group: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<usize>,
}

impl FeedSummary {
    pub fn from_records(records: &[SiteRecord]) -> Self {
        let mut periods: HashMap<&str, usize> = HashMap::new();
        let mut groups: HashMap<&str, usize> = HashMap::new();
        for r in records {
            *periods.entry(SiteFilterEngine::derive_period(r)).or_default() += 1;
            *groups.entry(r.group.as_deref().unwrap_or(NONE_FACET)).or_default() += 1;
        }

        let mut by_period: Vec<(String, usize)> = periods
            .into_iter()
            .map(|(p, n)| (p.to_string(), n))
            .collect();
        by_period.sort_by(|a, b| period_sort_key(&a.0).cmp(&period_sort_key(&b.0)));

        let mut by_group: Vec<(String, usize)> = groups
            .into_iter()
            .map(|(g, n)| (g.to_string(), n))
            .collect();
        by_group.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let dated = records.iter().filter(|r| r.is_dated()).count();

        FeedSummary {
            total: records.len(),
            dated,
            undated: records.len() - dated,
            by_period,
            by_group,
            extent: year_extent(records),
            visible: None,
        }
    }

    /// Summary with the number of sites the given filter leaves visible.
    pub fn visible_from(
        engine: &SiteFilterEngine,
        records: &[SiteRecord],
        state: &FilterState,
    ) -> Self {
        let mut summary = Self::from_records(records);
        summary.visible = Some(engine.visible_indices(records, state).len());
        summary
    }
}
