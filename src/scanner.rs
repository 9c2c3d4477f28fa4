use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SiteMapError};

/// Export file names written by `export`; never treated as input feeds.
const SKIP_NAMES: &[&str] = &["sites.json", "summary.json"];

/// Discover all feed files under `root`, sorted by path.
///
/// A feed is any `.geojson` or `.json` file. Hidden directories
/// (`.git`, …) and `target/` are not descended into.
pub fn scan_feeds(root: &Path) -> Result<Vec<PathBuf>> {
    let mut feeds: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e))
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_feed_file(p))
        .collect();

    if feeds.is_empty() {
        return Err(SiteMapError::NoFeeds {
            root: root.to_path_buf(),
        });
    }

    feeds.sort();
    Ok(feeds)
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_str().unwrap_or("");
    name.starts_with('.') || name == "target"
}

fn is_feed_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case("geojson") && !ext.eq_ignore_ascii_case("json") {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    !SKIP_NAMES.contains(&name)
}
