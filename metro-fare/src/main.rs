use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use metro_fare::batch::{JsonDirSink, export_to_sink_parallel};
use metro_fare::config::AppConfig;
use metro_fare::dataset::load_network;
use metro_fare::network::MetroNetwork;
use metro_fare::planner::{Planner, ReachableStation, group_by_line};
use metro_fare::web::{AppState, create_router};

/// Which metro stations can I reach for a given fare?
#[derive(Parser)]
#[command(name = "metro-fare", version, about)]
struct Cli {
    /// Read the network from this file instead of downloading it
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the stations reachable from a station for exactly one fare
    Query {
        /// Origin station name
        station: String,
        /// Fare to match exactly
        fare: u32,
        /// Print the station-by-station route
        #[arg(long)]
        show_path: bool,
        /// Group destinations under the lines serving them
        #[arg(long)]
        group_by_line: bool,
    },
    /// Write the fare table of every origin station to a directory
    Export {
        output_dir: PathBuf,
        /// Number of searches run at once
        #[arg(long, default_value_t = 4)]
        workers: usize,
    },
    /// Run the web interface
    Serve {
        /// Address to listen on, overriding METRO_BIND_ADDR
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// Directory of static assets
        #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/static"))]
        static_dir: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.data_file {
        config.dataset.local_file = Some(path);
    }

    let network = match load_network(&config.dataset).await {
        Ok(network) => network,
        Err(e) => {
            error!(error = %e, "Failed to load network");
            return ExitCode::FAILURE;
        }
    };
    info!(
        stations = network.len(),
        lines = network.lines().len(),
        "Network loaded"
    );

    match cli.command {
        Command::Query {
            station,
            fare,
            show_path,
            group_by_line,
        } => query(&network, &station, fare, show_path, group_by_line),
        Command::Export {
            output_dir,
            workers,
        } => export(network, output_dir, workers).await,
        Command::Serve { addr, static_dir } => {
            let addr = addr.unwrap_or(config.bind_addr);
            serve(network, &config, addr, &static_dir).await
        }
    }
}

fn query(
    network: &MetroNetwork,
    station: &str,
    fare: u32,
    show_path: bool,
    by_line: bool,
) -> ExitCode {
    let Some(origin) = network.station_id_by_name(station) else {
        println!("Unknown station: {}", station.trim());
        return ExitCode::FAILURE;
    };

    let stations = match Planner::new(network).reachable(origin, Some(fare)) {
        Ok(stations) => stations,
        Err(e) => {
            error!(error = %e, "Search failed");
            return ExitCode::FAILURE;
        }
    };

    if by_line {
        for group in group_by_line(&stations) {
            println!("[{}]", group.line);
            for s in &group.stations {
                println!("  {}", format_row(s, show_path));
            }
        }
    } else {
        for s in &stations {
            println!("{}", format_row(s, show_path));
        }
    }

    println!(
        "{} station(s) reachable from {} for fare {}",
        stations.len(),
        network.station_name(&origin),
        fare
    );
    ExitCode::SUCCESS
}

fn format_row(station: &ReachableStation, show_path: bool) -> String {
    let mut row = format!(
        "{} | distance: {}m | fare: {}",
        station.name, station.distance, station.fare
    );
    if show_path {
        row.push_str(&format!(" | path: {}", station.path_text()));
    }
    row.push_str(&format!(" | lines: {}", station.lines_text()));
    row
}

async fn export(network: MetroNetwork, output_dir: PathBuf, workers: usize) -> ExitCode {
    let mut sink = match JsonDirSink::new(&output_dir) {
        Ok(sink) => sink,
        Err(e) => {
            error!(error = %e, "Cannot open output directory");
            return ExitCode::FAILURE;
        }
    };

    let summary = export_to_sink_parallel(Arc::new(network), &mut sink, workers).await;
    println!(
        "Exported {} of {} origins to {} ({} failed)",
        summary.written,
        summary.origins,
        output_dir.display(),
        summary.failed
    );
    ExitCode::SUCCESS
}

async fn serve(
    network: MetroNetwork,
    config: &AppConfig,
    addr: SocketAddr,
    static_dir: &str,
) -> ExitCode {
    let state = AppState::new(network, &config.results);
    let app = create_router(state, static_dir);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("Metro fare explorer listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET /health               - Health check");
    info!("  GET /api/stations/search  - Search station names");
    info!("  GET /reachable            - Stations reachable for a fare");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
