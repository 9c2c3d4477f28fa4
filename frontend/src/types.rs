use serde::Deserialize;

// Re-export shared types from site_types
pub use site_types::{FilterConfig, FilterState, SiteRecord, SliderMode};

// ── sites.json ───────────────────────────────────────────────────────────────

/// One entry of `sites.json` as written by `site_map export`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteEntry {
    #[serde(flatten)]
    pub site: SiteRecord,
    #[serde(rename = "derivedPeriod")]
    pub derived_period: String,
}

pub async fn fetch_sites() -> Result<Vec<SiteEntry>, String> {
    let resp = gloo_net::http::Request::get("/data/sites.json")
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("/data/sites.json: HTTP {}", resp.status()));
    }
    resp.json::<Vec<SiteEntry>>().await.map_err(|e| e.to_string())
}
