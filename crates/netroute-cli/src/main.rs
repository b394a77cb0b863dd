//! netroute - shortest route lookup between two devices
//!
//! Loads a device file and a connection file, then prints the route with the
//! fewest hops between a source and a destination device.

mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use netroute_core::{ingest, Network};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, LoggingConfig};
use crate::report::RouteReport;

#[derive(Parser, Debug)]
#[command(name = "netroute")]
#[command(about = "Find the shortest route between two network devices")]
#[command(version)]
struct Args {
    /// Device file (`id,type[,config]` per line)
    devices: PathBuf,

    /// Connection file (`id,id` per line)
    connections: PathBuf,

    /// Source device id
    source: String,

    /// Destination device id
    destination: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "netroute.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Also append log output to a file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Reject malformed connections instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Print the route as JSON
    #[arg(long)]
    json: bool,

    /// Print the loaded devices before the route
    #[arg(long)]
    show_devices: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" | "severe" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Console output plus, when configured, a plain-text copy appended to the log file
fn log_layers<S, W>(logging: &LoggingConfig, console: W) -> Result<impl Layer<S>>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = LevelFilter::from_level(parse_level(&logging.level));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let console_layer = fmt::layer().with_target(true).with_writer(console);
    Ok(console_layer.and_then(file_layer).with_filter(level))
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(log_layers(logging, std::io::stderr)?)
        .try_init()?;
    Ok(())
}

async fn read_input(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Read both input files concurrently, then apply devices before connections
async fn load_network(args: &Args, config: &Config) -> Result<Network> {
    let (devices, connections) =
        tokio::try_join!(read_input(&args.devices), read_input(&args.connections))?;

    let mut network = Network::new();

    ingest::load_devices(&mut network, &devices)
        .with_context(|| format!("Invalid device file {}", args.devices.display()))?;
    ingest::load_connections(&mut network, &connections, config.ingest.strict_connections)
        .with_context(|| format!("Invalid connection file {}", args.connections.display()))?;

    network.log_summary();
    Ok(network)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_found) = config::load_config(&args.config)?;

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(file) = &args.log_file {
        config.logging.file = Some(file.clone());
    }
    if args.strict {
        config.ingest.strict_connections = true;
    }

    init_logging(&config.logging)?;

    info!("netroute v{}", env!("CARGO_PKG_VERSION"));
    if config_found {
        info!(path = %args.config.display(), "Loaded configuration");
    } else {
        info!(
            path = %args.config.display(),
            "Configuration file not found, using defaults"
        );
    }

    let network = match load_network(&args, &config).await {
        Ok(network) => network,
        Err(e) => {
            error!("Error loading files: {:#}", e);
            return Err(e);
        }
    };

    if args.show_devices {
        println!("{}", report::device_listing(&network.list_devices()));
    }

    for (role, id) in [("Start", &args.source), ("End", &args.destination)] {
        if let Some(device) = network.registry().get(id) {
            info!(device = %device.id, "{} device found: {}", role, device);
        }
    }

    let route = network.shortest_path(&args.source, &args.destination);
    let report = RouteReport::new(&args.source, &args.destination, &route);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text(&config.output.separator));
    }

    Ok(())
}
