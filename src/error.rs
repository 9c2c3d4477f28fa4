use std::path::PathBuf;

/// Errors raised while loading feeds or configuration.
#[derive(Debug, thiserror::Error)]
pub enum SiteMapError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse GeoJSON in {}: {source}", .path.display())]
    GeoJson {
        path: PathBuf,
        source: Box<geojson::Error>,
    },

    #[error("{} is not a FeatureCollection", .path.display())]
    NotACollection { path: PathBuf },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no GeoJSON feeds found under {}", .root.display())]
    NoFeeds { root: PathBuf },
}

pub type Result<T> = std::result::Result<T, SiteMapError>;
