mod config;
mod error;
mod feed;
mod scanner;
mod summary;
mod years;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use site_types::{
    FilterState, PERIOD_TABLE, SiteFilterEngine, SiteRecord, SliderMode, UndatedPolicy,
    format_year, year_extent,
};

use config::Config;
use error::{Result, SiteMapError};
use summary::FeedSummary;

#[derive(Parser)]
#[command(name = "site_map", about = "Historic site feed filter and exporter")]
struct Cli {
    /// Config file (defaults to ./site_map.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the sites a filter leaves visible
    Filter {
        /// Feed file, or a directory of feeds
        feed: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the period table used for sites without a period label
    Periods,
    /// Counts per period and group (legend data)
    Summary {
        /// Feed file, or a directory of feeds
        feed: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write sites.json and summary.json for the frontend
    Export {
        /// Feed file, or a directory of feeds
        feed: PathBuf,
        /// Output directory (overrides the config's output_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List feed files found under a directory
    Scan {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Lower year bound, e.g. 1200, -800, "800 BC"
    #[arg(long, value_parser = parse_year_arg, allow_hyphen_values = true)]
    min: Option<f64>,
    /// Upper year bound
    #[arg(long, value_parser = parse_year_arg, allow_hyphen_values = true)]
    max: Option<f64>,
    /// Active period (repeatable); none means all periods
    #[arg(long = "period")]
    periods: Vec<String>,
    /// Active group (repeatable); "(none)" selects sites without a group
    #[arg(long = "group")]
    groups: Vec<String>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum)]
    undated: Option<UndatedArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Range,
    Cutoff,
}

#[derive(Clone, Copy, ValueEnum)]
enum UndatedArg {
    Visible,
    Hidden,
}

fn parse_year_arg(raw: &str) -> std::result::Result<f64, String> {
    years::parse_year_text(raw).ok_or_else(|| format!("not a year: {raw:?}"))
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Filter { feed, filter, json } => run_filter(&config, &feed, &filter, json),
        Command::Periods => {
            run_periods();
            Ok(())
        }
        Command::Summary { feed, filter } => run_summary(&config, &feed, &filter),
        Command::Export { feed, out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            run_export(&feed, &out_dir)
        }
        Command::Scan { root } => run_scan(&root),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  LOADING
// ═══════════════════════════════════════════════════════════════════════

/// Load one feed file, or every feed under a directory.
fn load_sites(path: &Path) -> Result<Vec<SiteRecord>> {
    if !path.is_dir() {
        return feed::load_feed(path);
    }
    let mut sites = Vec::new();
    for file in scanner::scan_feeds(path)? {
        sites.extend(feed::load_feed(&file)?);
    }
    log::info!("loaded {} sites from {}", sites.len(), path.display());
    Ok(sites)
}

/// Build the engine and filter state from config overridden by flags.
fn build_filter(
    config: &Config,
    args: &FilterArgs,
    sites: &[SiteRecord],
) -> (SiteFilterEngine, FilterState) {
    let mut filter_config = config.filter;
    if let Some(mode) = args.mode {
        filter_config.slider_mode = match mode {
            ModeArg::Range => SliderMode::Range,
            ModeArg::Cutoff => SliderMode::Cutoff,
        };
    }
    if let Some(undated) = args.undated {
        filter_config.treat_undated_as = match undated {
            UndatedArg::Visible => UndatedPolicy::Visible,
            UndatedArg::Hidden => UndatedPolicy::Hidden,
        };
    }

    let (min, max) = config.resolve_bounds(args.min, args.max, year_extent(sites));
    if min > max {
        log::warn!("year bounds inverted ({min} > {max}), swapping");
    }
    let state = FilterState::new(min, max)
        .with_periods(args.periods.iter().cloned())
        .with_groups(args.groups.iter().cloned());

    (SiteFilterEngine::new(filter_config), state)
}

// ═══════════════════════════════════════════════════════════════════════
//  FILTER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct SiteOutput<'a> {
    #[serde(flatten)]
    site: &'a SiteRecord,
    #[serde(rename = "derivedPeriod")]
    derived_period: &'a str,
}

impl<'a> SiteOutput<'a> {
    fn new(site: &'a SiteRecord) -> Self {
        Self {
            site,
            derived_period: SiteFilterEngine::derive_period(site),
        }
    }
}

fn run_filter(config: &Config, feed: &Path, args: &FilterArgs, json: bool) -> Result<()> {
    let sites = load_sites(feed)?;
    let (engine, state) = build_filter(config, args, &sites);

    let visible: Vec<&SiteRecord> = engine
        .visible_indices(&sites, &state)
        .into_iter()
        .map(|i| &sites[i])
        .collect();

    eprintln!(
        "{} of {} sites visible ({:?} mode, {} to {})",
        visible.len(),
        sites.len(),
        engine.config.slider_mode,
        format_year(state.min_year),
        format_year(state.max_year),
    );

    if json {
        let out: Vec<SiteOutput> = visible.iter().map(|s| SiteOutput::new(s)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for site in visible {
        println!(
            "{:<32} {:<16} {:<14} {}",
            site.name,
            site.group.as_deref().unwrap_or("-"),
            SiteFilterEngine::derive_period(site),
            site.date_label().unwrap_or_default(),
        );
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  PERIODS
// ═══════════════════════════════════════════════════════════════════════

fn run_periods() {
    for period in PERIOD_TABLE.iter().map(|e| e.period) {
        let (from, until) = period.bounds();
        let from = from.map_or("…".to_string(), format_year);
        let until = until.map_or("…".to_string(), format_year);
        println!("{period:<16} {from} – {until}");
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  SUMMARY / EXPORT
// ═══════════════════════════════════════════════════════════════════════

fn run_summary(config: &Config, feed: &Path, args: &FilterArgs) -> Result<()> {
    let sites = load_sites(feed)?;
    let (engine, state) = build_filter(config, args, &sites);
    let summary = FeedSummary::visible_from(&engine, &sites, &state);

    println!(
        "{} sites ({} dated, {} undated)",
        summary.total, summary.dated, summary.undated
    );
    if let Some((lo, hi)) = summary.extent {
        println!("dates: {} – {}", format_year(lo), format_year(hi));
    }
    if let Some(visible) = summary.visible {
        println!("visible under current filter: {visible}");
    }

    println!("\nby period:");
    for (period, count) in &summary.by_period {
        println!("  {period:<16} {count}");
    }
    println!("\nby group:");
    for (group, count) in &summary.by_group {
        println!("  {group:<16} {count}");
    }
    Ok(())
}

fn write_json<T: Serialize>(dir: &Path, name: &str, data: &T) -> Result<()> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(&path, &json).map_err(|source| SiteMapError::Io {
        path: path.clone(),
        source,
    })?;
    eprintln!("  {} ({} bytes)", path.display(), json.len());
    Ok(())
}

fn run_export(feed: &Path, out_dir: &Path) -> Result<()> {
    let sites = load_sites(feed)?;
    std::fs::create_dir_all(out_dir).map_err(|source| SiteMapError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let out: Vec<SiteOutput> = sites.iter().map(SiteOutput::new).collect();
    write_json(out_dir, "sites.json", &out)?;
    write_json(out_dir, "summary.json", &FeedSummary::from_records(&sites))?;
    Ok(())
}

fn run_scan(root: &Path) -> Result<()> {
    for path in scanner::scan_feeds(root)? {
        match feed::load_feed(&path) {
            Ok(sites) => println!("{:>6}  {}", sites.len(), path.display()),
            Err(e) => println!("     -  {} ({e})", path.display()),
        }
    }
    Ok(())
}
