//! GeoJSON feed loading.
//!
//! Each feature's properties become one `SiteRecord`. The historical
//! datasets disagree on property names ("Name" vs "name", "PeriodStart"
//! vs "startYear", "category" vs "group"), so every field is looked up
//! through a list of aliases, first non-null hit wins.

use std::path::Path;

use geojson::{Feature, GeoJson, JsonObject, JsonValue, Value};
use site_types::{SiteRecord, UNNAMED_SITE};

use crate::error::{Result, SiteMapError};
use crate::years::parse_year_text;

const NAME_KEYS: &[&str] = &["name", "Name"];
const GROUP_KEYS: &[&str] = &["group", "Group", "category", "Category"];
const TYPE_KEYS: &[&str] = &["type", "Type", "SiteType", "siteType", "site_type"];
const PERIOD_KEYS: &[&str] = &["period", "Period"];
const YEAR_KEYS: &[&str] = &["year", "Year"];
const START_KEYS: &[&str] = &["startYear", "PeriodStart", "start_year"];
const END_KEYS: &[&str] = &["endYear", "PeriodEnd", "end_year"];
const MID_KEYS: &[&str] = &["midYear", "MidYear", "mid_year"];

/// Read and parse a feed file.
pub fn load_feed(path: &Path) -> Result<Vec<SiteRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| SiteMapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_feed(path, &text)?;
    log::info!("loaded {} sites from {}", records.len(), path.display());
    Ok(records)
}

/// Parse feed text. `path` is only used for error messages.
pub fn parse_feed(path: &Path, text: &str) -> Result<Vec<SiteRecord>> {
    let geojson: GeoJson = text.parse().map_err(|source| SiteMapError::GeoJson {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            Ok(collection.features.iter().map(record_from_feature).collect())
        }
        GeoJson::Feature(feature) => Ok(vec![record_from_feature(&feature)]),
        GeoJson::Geometry(_) => Err(SiteMapError::NotACollection {
            path: path.to_path_buf(),
        }),
    }
}

/// Extract a site from one feature. Missing or malformed fields become `None`.
pub fn record_from_feature(feature: &Feature) -> SiteRecord {
    let empty = JsonObject::new();
    let props = match &feature.properties {
        Some(p) => p,
        None => {
            log::warn!("feature without properties, loading as an unnamed site");
            &empty
        }
    };

    let name = text_field(props, NAME_KEYS).unwrap_or_else(|| UNNAMED_SITE.to_string());
    let coordinates = point_coordinates(feature);
    if coordinates.is_none() {
        log::warn!("site {name:?} has no point geometry");
    }

    SiteRecord {
        group: text_field(props, GROUP_KEYS),
        site_type: text_field(props, TYPE_KEYS),
        period: text_field(props, PERIOD_KEYS),
        year: year_field(props, YEAR_KEYS, &name),
        start_year: year_field(props, START_KEYS, &name),
        end_year: year_field(props, END_KEYS, &name),
        mid_year: year_field(props, MID_KEYS, &name),
        coordinates,
        name,
    }
}

fn lookup<'a>(props: &'a JsonObject, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|k| props.get(*k))
        .find(|v| !v.is_null())
}

fn text_field(props: &JsonObject, keys: &[&str]) -> Option<String> {
    match lookup(props, keys)? {
        JsonValue::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn year_field(props: &JsonObject, keys: &[&str], site: &str) -> Option<f64> {
    let value = lookup(props, keys)?;
    let year = match value {
        JsonValue::Number(n) => n.as_f64().filter(|y| y.is_finite()),
        JsonValue::String(s) => parse_year_text(s),
        _ => None,
    };
    if year.is_none() {
        log::debug!("site {site:?}: ignoring non-numeric year {value}");
    }
    year
}

fn point_coordinates(feature: &Feature) -> Option<[f64; 2]> {
    match &feature.geometry.as_ref()?.value {
        Value::Point(position) => match (position.first(), position.get(1)) {
            (Some(&lon), Some(&lat)) => Some([lon, lat]),
            _ => None,
        },
        _ => None,
    }
}
