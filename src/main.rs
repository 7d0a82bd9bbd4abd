//! Command-line front end: fills the form from flags and prints the route distance.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use waypoint_router::{
    config::AppConfig,
    haversine::HaversineRouter,
    logging::init_logging,
    orchestrator::RouteOrchestrator,
    osrm::OsrmClient,
    presentation::{GeoJsonRenderer, View, render_text},
    state::StateStore,
    traits::{MapRenderer, RoutingProvider},
};

/// Road distance between two points, optionally via intermediate stops.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Start point as "lat,lon" (e.g. "25.30,82.97")
    #[arg(short, long, allow_hyphen_values = true)]
    origin: String,

    /// End point as "lat,lon"
    #[arg(short, long, allow_hyphen_values = true)]
    destination: String,

    /// Intermediate stop as "lat,lon"; repeat for several, in travel order
    #[arg(short, long = "stop", allow_hyphen_values = true)]
    stops: Vec<String>,

    /// Stop text not yet added; committed before the route is requested
    #[arg(long, allow_hyphen_values = true)]
    pending_stop: Option<String>,

    /// Use straight-line distances instead of a routing service
    #[arg(long)]
    offline: bool,

    /// OSRM base URL (overrides WAYPOINT_ROUTER_OSRM_URL)
    #[arg(long)]
    osrm_url: Option<String>,

    /// OSRM profile (overrides WAYPOINT_ROUTER_PROFILE)
    #[arg(long)]
    profile: Option<String>,

    /// Per-request timeout in seconds (overrides WAYPOINT_ROUTER_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Write the map scene as GeoJSON to this file
    #[arg(long)]
    geojson: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("waypoint-router: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.osrm_url {
        config.osrm.base_url = url;
    }
    if let Some(profile) = cli.profile {
        config.osrm.profile = profile;
    }
    if let Some(secs) = cli.timeout_secs {
        config.set_timeout_secs(secs);
    }

    let store = StateStore::new();
    store.set_origin(&cli.origin)?;
    store.set_destination(&cli.destination)?;
    for stop in &cli.stops {
        store.add_stop(stop)?;
    }
    if let Some(pending) = &cli.pending_stop {
        store.set_pending_stop(pending);
    }

    let provider: Box<dyn RoutingProvider> = if cli.offline {
        tracing::info!("Offline mode: using straight-line distances");
        Box::new(HaversineRouter::default())
    } else {
        tracing::info!(
            "Routing via {} ({})",
            config.osrm.base_url,
            config.osrm.profile
        );
        Box::new(OsrmClient::new(config.osrm.clone())?)
    };

    let orchestrator =
        RouteOrchestrator::new(provider, store.clone()).with_options(config.orchestrator.clone());
    let outcome = orchestrator.calculate().await;

    let view = View::from_state(&store.snapshot(), &config.map);
    println!("{}", render_text(&view));

    if let Some(path) = &cli.geojson {
        let mut renderer = GeoJsonRenderer::new();
        let Ok(()) = renderer.draw(&view.scene);
        if let Some(collection) = renderer.collection() {
            std::fs::write(path, serde_json::to_string_pretty(collection)?)?;
            tracing::info!("Wrote map scene to {}", path.display());
        }
    }

    outcome?;
    Ok(())
}
