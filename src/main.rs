use std::io;
use std::process::ExitCode;
use clap::Parser;
use log::error;
use gfsrain::initialization::{init, Overrides};
use gfsrain::session::Session;
use gfsrain::worker::{run_interactive, run_once, Presentation};

/// Hourly rainfall forecast for a location, with summary, chart, heatmap and CSV/JSON export
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Latitude in decimal degrees, -90 to 90
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees, -180 to 180
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Forecast horizon in hours: 24, 48, 72, 120 or 168
    #[arg(long)]
    hours: Option<u32>,

    /// Directory for CSV and JSON exports
    #[arg(long)]
    export_dir: Option<String>,

    /// Also print the data table
    #[arg(long)]
    table: bool,

    /// Don't write CSV and JSON exports
    #[arg(long)]
    no_export: bool,

    /// Read requests from stdin, one `<lat> <lon> <hours>` per line
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let overrides = Overrides {
        lat: cli.lat,
        long: cli.lon,
        hours: cli.hours,
        export_dir: cli.export_dir.clone(),
    };

    let (config, _log_handle) = init(cli.config.as_deref(), &overrides)?;

    let presentation = Presentation { show_table: cli.table, export: !cli.no_export };
    let mut session = Session::new(config.forecast.clone(), config.cache.ttl_secs);
    let mut stdout = io::stdout().lock();

    let result = if cli.interactive {
        run_interactive(&mut session, &config, &presentation, io::stdin().lock(), &mut stdout)
            .map(|_| ExitCode::SUCCESS)
    } else {
        run_once(&mut session, &config, &presentation, &mut stdout)
            .map(|ok| if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
