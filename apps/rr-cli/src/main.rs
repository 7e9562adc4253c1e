//! rr-cli — run one route recommendation from local files.
//!
//! ```text
//! rr-cli --nodes nodes.csv --edges edges.csv --features features.csv \
//!        --start 35.8304,128.7544 --end "Daegu Univ" --geocode addresses.csv
//! ```
//!
//! The JSON response goes to stdout; log records go to stderr (`RUST_LOG`
//! or `--verbose`).

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rr_core::{Avoid, Place, Preferences, RouteConfig};
use rr_label::CsvFeatureSource;
use rr_pipeline::{CsvGraphProvider, Location, PipelineBuilder, RouteRequest, TableGeocoder};
use rr_spatial::DijkstraRouter;

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "rr-cli")]
#[command(about = "Recommend running routes between two points", long_about = None)]
struct Cli {
    /// Node CSV (`id,lat,lon`)
    #[arg(long)]
    nodes: PathBuf,
    /// Edge CSV (`from,to,length[,weight]`)
    #[arg(long)]
    edges: PathBuf,
    /// Feature CSV (`geometry` WKT column plus one column per tag)
    #[arg(long)]
    features: Option<PathBuf>,
    /// Address table CSV (`address,lat,lon`)
    #[arg(long)]
    geocode: Option<PathBuf>,
    /// Start as `lat,lon` or an address
    #[arg(long)]
    start: String,
    /// End as `lat,lon` or an address
    #[arg(long)]
    end: String,
    /// JSON file with `RouteConfig` fields; missing fields keep defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of routes to return
    #[arg(long)]
    max_results: Option<usize>,
    /// Places to favour, comma-separated (`park`, `river`)
    #[arg(long, value_delimiter = ',')]
    prefer: Vec<String>,
    /// Conditions to avoid, comma-separated (`dark`)
    #[arg(long, value_delimiter = ',')]
    avoid: Vec<String>,
    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

/// `"35.83,128.75"` → coordinates; anything else is an address.
fn parse_location(s: &str) -> Location {
    let mut parts = s.split(',');
    if let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) {
        if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
            return Location::coord(lat, lon);
        }
    }
    Location::address(s.trim())
}

fn preferences(prefer: &[String], avoid: &[String]) -> Preferences {
    Preferences {
        places: prefer.iter().map(|s| Place::from(s.as_str())).collect(),
        avoid:  avoid.iter().map(|s| Avoid::from(s.as_str())).collect(),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RouteConfig> {
    let Some(path) = path else {
        return Ok(RouteConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    // 1. Config.
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(n) = cli.max_results {
        config.max_results = n;
    }
    config.validate()?;

    if let Some(threads) = config.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("sizing the worker pool")?;
    }
    info!("worker threads: {}", rayon::current_num_threads());

    // 2. Pipeline.
    let mut builder = PipelineBuilder::new(config, DijkstraRouter)
        .graph_provider(CsvGraphProvider::new(&cli.nodes, &cli.edges));
    if let Some(path) = &cli.features {
        let source = CsvFeatureSource::from_path(path)
            .with_context(|| format!("loading features {}", path.display()))?;
        info!("loaded {} features", source.len());
        builder = builder.feature_source(source);
    }
    if let Some(path) = &cli.geocode {
        let table = TableGeocoder::from_path(path)?;
        info!("loaded {} addresses", table.len());
        builder = builder.geocoder(table);
    }
    let pipeline = builder.build()?;

    // 3. Request.
    let request = RouteRequest::new(parse_location(&cli.start), parse_location(&cli.end))
        .with_preferences(preferences(&cli.prefer, &cli.avoid));
    let t0 = Instant::now();
    let response = pipeline.recommend(&request)?;
    info!("{} routes in {:.2?}", response.len(), t0.elapsed());

    // 4. Output.
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, &response)?;
    } else {
        serde_json::to_writer(&mut out, &response)?;
    }
    writeln!(out)?;
    Ok(())
}
