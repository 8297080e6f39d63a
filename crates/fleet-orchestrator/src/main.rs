//! Fleet Orchestrator - barrier-synchronized multi-vehicle flag search
//!
//! Connects to one autopilot per `<port>` argument, waits for the fleet to
//! announce itself, partitions the search area equally across whichever
//! vehicles actually showed up, and runs every vehicle's mission pipeline
//! to completion (or to the first flag find).

mod barrier;
mod config;
mod fleet;
mod operation;
mod pipeline;
mod search;

use anyhow::{bail, Result};
use clap::Parser;
use config::Config;
use fleet_core::{GoCenter, Point, Polygon, ReturnCode};
use fleet_transport::{MockConnectionManager, Position};
use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Runs a fleet search across one autopilot system per port given.
#[derive(Debug, Parser)]
#[command(name = "fleet-orchestrator", version, about)]
struct Cli {
    /// Autopilot UDP ports to connect to, e.g. `14540 14541`.
    #[arg(required = true)]
    ports: Vec<u16>,

    /// Use the in-process mock vehicle fleet instead of connecting to real
    /// autopilots, for demos and dry runs.
    #[arg(long, default_value_t = true)]
    dry_run: bool,
}

/// Wraps `writer` as a boxed fmt layer, text or JSON depending on
/// `FLEET_LOG_FORMAT`, so stdout and both log files can share one format
/// decision without forcing every sink through the same concrete type.
fn make_layer<W>(writer: W, json: bool) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    if json {
        Box::new(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false).json())
    } else {
        Box::new(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
    }
}

/// Every record goes to stdout and to both `logs/last_execution.log`
/// (truncated at the start of each run) and `logs/history.log` (appended
/// across runs), per spec §6.
fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("fleet_orchestrator=debug".parse()?);
    let json = std::env::var("FLEET_LOG_FORMAT").unwrap_or_default().trim().eq_ignore_ascii_case("json");

    std::fs::create_dir_all("logs")?;
    let last_execution = Mutex::new(
        OpenOptions::new().create(true).write(true).truncate(true).open("logs/last_execution.log")?,
    );
    let history = Mutex::new(OpenOptions::new().create(true).append(true).open("logs/history.log")?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(make_layer(io::stdout, json))
        .with(make_layer(last_execution, json))
        .with(make_layer(history, json))
        .init();
    Ok(())
}

fn main() -> Result<ExitCode> {
    init_tracing()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap's own process::exit bypasses our return-code taxonomy, so
            // print its message ourselves and map the failure to BadArgument.
            err.print().ok();
            return Ok(ExitCode::from(ReturnCode::BadArgument.code() as u8));
        }
    };

    if cli.ports.is_empty() {
        tracing::error!("at least one autopilot port is required");
        return Ok(ExitCode::from(ReturnCode::BadArgument.code() as u8));
    }
    if !cli.dry_run {
        bail!("this build only wires up the mock vehicle fleet; pass --dry-run");
    }

    tracing::info!(ports = ?cli.ports, "starting fleet orchestrator");

    let config = Config::from_env();

    // Active search area and flag position, matching the source's
    // quadrilateral-via-local-offsets construction and fixed flag position.
    let search_area = Polygon::new(vec![
        Point::new(47.397, 8.545),
        Point::new(47.398, 8.545),
        Point::new(47.398, 8.547),
        Point::new(47.397, 8.547),
    ]);
    let flag = fleet_core::FixedFlag::new(Point::new(47.397637, 8.545618));

    let manager =
        MockConnectionManager::new(cli.ports.iter().map(|_| mock_position(&search_area)).collect());

    let code = fleet::run_search(&manager, config, &cli.ports, search_area, GoCenter, flag);

    tracing::info!(code = code.code(), "fleet search finished");
    Ok(ExitCode::from(code.code() as u8))
}

fn mock_position(area: &Polygon) -> Position {
    let center = area.find_center().unwrap_or(Point::ZERO);
    Position { latitude_deg: center.x, longitude_deg: center.y, relative_altitude_m: 0.0 }
}
