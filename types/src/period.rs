//! Static table of historical periods and their year boundaries.
//!
//! Used only when a site carries no explicit period label: the site's
//! single representative year is mapped onto the first interval that
//! contains it.

use serde::{Deserialize, Serialize};

pub const UNKNOWN_PERIOD: &str = "Unknown";

// ── Period ───────────────────────────────────────────────────────────

/// A named era, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    Prehistoric,
    BronzeAge,
    IronAge,
    Roman,
    EarlyMedieval,
    Medieval,
    PostMedieval,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prehistoric => "Prehistoric",
            Self::BronzeAge => "Bronze Age",
            Self::IronAge => "Iron Age",
            Self::Roman => "Roman",
            Self::EarlyMedieval => "Early Medieval",
            Self::Medieval => "Medieval",
            Self::PostMedieval => "Post-Medieval",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        PERIOD_TABLE
            .iter()
            .map(|e| e.period)
            .find(|p| p.as_str() == label)
    }

    /// Look up the period containing `year`. Non-finite years have none.
    pub fn from_year(year: f64) -> Option<Self> {
        if !year.is_finite() {
            return None;
        }
        PERIOD_TABLE
            .iter()
            .find(|e| e.contains(year))
            .map(|e| e.period)
    }

    /// `(inclusive lower, exclusive upper)` bounds; `None` is unbounded.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        PERIOD_TABLE
            .iter()
            .find(|e| e.period == *self)
            .map(|e| (e.from, e.until))
            .unwrap_or((None, None))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ── Period table ─────────────────────────────────────────────────────

/// One half-open interval `[from, until)` of the period table.
pub struct PeriodEntry {
    pub period: Period,
    pub from: Option<f64>,
    pub until: Option<f64>,
}

impl PeriodEntry {
    pub fn contains(&self, year: f64) -> bool {
        self.from.is_none_or(|f| year >= f) && self.until.is_none_or(|u| year < u)
    }
}

/// Ascending, contiguous, and covering the whole number line.
pub static PERIOD_TABLE: &[PeriodEntry] = &[
    PeriodEntry {
        period: Period::Prehistoric,
        from: None,
        until: Some(-2500.0),
    },
    PeriodEntry {
        period: Period::BronzeAge,
        from: Some(-2500.0),
        until: Some(-800.0),
    },
    PeriodEntry {
        period: Period::IronAge,
        from: Some(-800.0),
        until: Some(43.0),
    },
    PeriodEntry {
        period: Period::Roman,
        from: Some(43.0),
        until: Some(410.0),
    },
    PeriodEntry {
        period: Period::EarlyMedieval,
        from: Some(410.0),
        until: Some(1066.0),
    },
    PeriodEntry {
        period: Period::Medieval,
        from: Some(1066.0),
        until: Some(1500.0),
    },
    PeriodEntry {
        period: Period::PostMedieval,
        from: Some(1500.0),
        until: None,
    },
];

/// Sort key placing table periods chronologically and any other label after them.
pub fn period_sort_key(label: &str) -> (usize, &str) {
    let pos = Period::from_label(label).map_or(PERIOD_TABLE.len(), |p| p as usize);
    (pos, label)
}
