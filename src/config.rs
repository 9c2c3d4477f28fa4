//! Optional `site_map.toml` configuration.
//!
//! ```toml
//! output_dir = "output"
//!
//! [filter]
//! slider_mode = "range"          # or "cutoff"
//! treat_undated_as = "visible"   # or "hidden"
//!
//! [bounds]
//! min_year = -4000
//! max_year = 2025
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use site_types::FilterConfig;

use crate::error::{Result, SiteMapError};

pub const DEFAULT_CONFIG_FILE: &str = "site_map.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Slider bounds used when neither the command line nor the data supply any.
pub const FALLBACK_BOUNDS: (f64, f64) = (-4000.0, 2025.0);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_year: Option<f64>,
    pub max_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub bounds: Bounds,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            bounds: Bounds::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| SiteMapError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the given file, or `site_map.toml` if present, or defaults.
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| SiteMapError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&path, &text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve slider bounds: explicit values, then config, then the data
    /// extent, then the fallback.
    ///
    /// A bound taken from the extent or fallback is clamped against the
    /// given one, so only a pair supplied in full can come back inverted.
    pub fn resolve_bounds(
        &self,
        min_arg: Option<f64>,
        max_arg: Option<f64>,
        extent: Option<(f64, f64)>,
    ) -> (f64, f64) {
        let (fallback_min, fallback_max) = extent.unwrap_or(FALLBACK_BOUNDS);
        match (min_arg.or(self.bounds.min_year), max_arg.or(self.bounds.max_year)) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, fallback_max.max(min)),
            (None, Some(max)) => (fallback_min.min(max), max),
            (None, None) => (fallback_min, fallback_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_types::{SliderMode, UndatedPolicy};

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml(Path::new("x.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn full_file() {
        let text = r#"
            output_dir = "public/data"

            [filter]
            slider_mode = "cutoff"
            treat_undated_as = "hidden"

            [bounds]
            min_year = -4000
            max_year = 1900.5
        "#;
        let config = Config::from_toml(Path::new("x.toml"), text).unwrap();
        assert_eq!(config.filter.slider_mode, SliderMode::Cutoff);
        assert_eq!(config.filter.treat_undated_as, UndatedPolicy::Hidden);
        assert_eq!(config.bounds.min_year, Some(-4000.0));
        assert_eq!(config.bounds.max_year, Some(1900.5));
        assert_eq!(config.output_dir, PathBuf::from("public/data"));
    }

    #[test]
    fn bad_value_is_reported_with_path() {
        let err = Config::from_toml(Path::new("bad.toml"), "[filter]\nslider_mode = \"dual\"")
            .unwrap_err();
        assert!(matches!(err, SiteMapError::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, SiteMapError::Io { .. }));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site_map.toml");
        std::fs::write(&path, "[filter]\ntreat_undated_as = \"hidden\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.filter.treat_undated_as, UndatedPolicy::Hidden);
    }

    #[test]
    fn bounds_resolution_order() {
        let mut config = Config::default();
        assert_eq!(config.resolve_bounds(None, None, None), FALLBACK_BOUNDS);
        assert_eq!(
            config.resolve_bounds(None, None, Some((43.0, 1271.0))),
            (43.0, 1271.0)
        );

        config.bounds.max_year = Some(1500.0);
        assert_eq!(
            config.resolve_bounds(None, None, Some((43.0, 1271.0))),
            (43.0, 1500.0)
        );
        assert_eq!(
            config.resolve_bounds(Some(0.0), Some(100.0), Some((43.0, 1271.0))),
            (0.0, 100.0)
        );
    }

    #[test]
    fn one_sided_bounds_clamp_the_extent() {
        let config = Config::default();
        let extent = Some((1268.0, 1271.0));
        assert_eq!(config.resolve_bounds(None, Some(1100.0), extent), (1100.0, 1100.0));
        assert_eq!(config.resolve_bounds(Some(1900.0), None, extent), (1900.0, 1900.0));
        assert_eq!(config.resolve_bounds(None, Some(1270.0), extent), (1268.0, 1270.0));

        let mut config = Config::default();
        config.bounds.max_year = Some(-5000.0);
        assert_eq!(config.resolve_bounds(None, None, None), (-5000.0, -5000.0));

        // a full explicit pair is returned as given
        assert_eq!(
            Config::default().resolve_bounds(Some(1900.0), Some(1066.0), extent),
            (1900.0, 1066.0)
        );
    }
}
