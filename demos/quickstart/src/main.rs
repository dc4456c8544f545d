//! quickstart — route between two coordinates on a road network.
//!
//! ```text
//! quickstart --start "12.9716,77.5946" --end "12.9569,77.7011" --weighting time
//! quickstart --nodes nodes.csv --edges edges.csv --config engine.json --start … --end …
//! quickstart --batch requests.json
//! ```
//!
//! Without `--nodes/--edges` a small built-in network is used.  The route is
//! printed to stdout as the JSON response object; a human-readable summary
//! goes to the log (`RUST_LOG=info`).

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use wf_core::{Algorithm, Weighting};
use wf_engine::{EngineConfig, RouteRequest, RouteResponse, RoutingEngine};

use network::{SAMPLE_END, SAMPLE_START, sample_network};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum WeightingArg {
    Distance,
    Time,
}

impl From<WeightingArg> for Weighting {
    fn from(w: WeightingArg) -> Self {
        match w {
            WeightingArg::Distance => Weighting::Distance,
            WeightingArg::Time     => Weighting::Time,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AlgorithmArg {
    Dijkstra,
    Astar,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(a: AlgorithmArg) -> Self {
        match a {
            AlgorithmArg::Dijkstra => Algorithm::Dijkstra,
            AlgorithmArg::Astar    => Algorithm::AStar,
        }
    }
}

#[derive(Parser)]
#[command(name = "quickstart")]
#[command(about = "Shortest or fastest route between two coordinates")]
struct Cli {
    /// Node CSV (id,lat,lon)
    #[arg(long, requires = "edges")]
    nodes: Option<PathBuf>,

    /// Edge CSV (from,to,length_m[,speed_mps,travel_time_s,bidirectional])
    #[arg(long, requires = "nodes")]
    edges: Option<PathBuf>,

    /// Engine configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start coordinate as "lat,lon"
    #[arg(long, default_value = SAMPLE_START)]
    start: String,

    /// End coordinate as "lat,lon"
    #[arg(long, default_value = SAMPLE_END)]
    end: String,

    #[arg(short, long, value_enum)]
    weighting: Option<WeightingArg>,

    #[arg(short, long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// JSON array of requests to answer instead of --start/--end
    #[arg(long, conflicts_with_all = ["start", "end"])]
    batch: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let started = Instant::now();
    let engine = match (&cli.nodes, &cli.edges) {
        (Some(nodes), Some(edges)) => RoutingEngine::load_csv(nodes, edges, config)
            .with_context(|| format!("loading {} / {}", nodes.display(), edges.display()))?,
        _ => {
            let (nodes, edges) = sample_network();
            RoutingEngine::from_specs(nodes, edges, config).context("building sample network")?
        }
    };
    log::info!(
        "{} nodes, {} edges ready in {:.1?}",
        engine.graph().node_count(),
        engine.graph().edge_count(),
        started.elapsed(),
    );

    if let Some(path) = &cli.batch {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let requests: Vec<RouteRequest> =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

        let started = Instant::now();
        let responses = engine.handle_batch(&requests);
        let ok = responses.iter().filter(|r| r.is_ok()).count();
        log::info!(
            "{} requests answered in {:.1?} ({ok} ok, {} failed)",
            responses.len(),
            started.elapsed(),
            responses.len() - ok,
        );
        print_json(&responses, cli.pretty)?;
        return Ok(());
    }

    let mut request = RouteRequest::parse(&cli.start, &cli.end)?;
    if let Some(w) = cli.weighting {
        request = request.with_weighting(w.into());
    }
    if let Some(a) = cli.algorithm {
        request = request.with_algorithm(a.into());
    }

    let response = engine.handle(&request);
    match &response {
        RouteResponse::Ok { path, distance_meters, eta_seconds } => log::info!(
            "route: {} points, {:.2} km, {:.1} min",
            path.len(),
            distance_meters / 1_000.0,
            eta_seconds / 60.0,
        ),
        RouteResponse::Error { kind, message } => log::error!("{kind}: {message}"),
    }
    print_json(&response, cli.pretty)?;

    if !response.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
