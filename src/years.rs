//! Lenient parsing of year text found in feeds and on the command line.
//!
//! Accepts plain integers ("1268", "-800"), era suffixes and prefixes
//! ("800 BC", "800 BCE", "AD 43", "43 CE") and approximate markers
//! ("c. 1200", "circa 1200", "ca 1200").

use std::sync::LazyLock;

use regex::Regex;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*
        (?:(?:c|ca|circa)\.?\s*)?
        (?P<pre>AD\s*)?
        (?P<num>[-−]?\d+(?:\.\d+)?)
        \s*
        (?P<era>BCE|BC|CE|AD)?
        \.?\s*$",
    )
    .expect("year regex is valid")
});

/// Parse a year, returning `None` for anything that isn't one.
/// BC/BCE years become negative.
pub fn parse_year_text(raw: &str) -> Option<f64> {
    let caps = YEAR_RE.captures(raw)?;
    let num = caps.name("num")?.as_str().replace('−', "-");
    let value: f64 = num.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let era = caps.name("era").map(|m| m.as_str().to_ascii_uppercase());
    match era.as_deref() {
        Some("BC" | "BCE") => {
            // "800 BC" is a year before the epoch; an explicit sign is contradictory
            if caps.name("pre").is_some() || value < 0.0 {
                None
            } else {
                Some(-value)
            }
        }
        _ => Some(value),
    }
}
