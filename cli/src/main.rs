use std::path::PathBuf;

use clap::Parser;
use roster_core::{OutputFormat, render};
use roster_source::{Config, DatabaseConfig, read_rooms, read_students};
use roster_sqlite::{Loader, Migration, Store, retrieve};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `roster_sqlite=debug`).
const LOG_ENV: &str = "ROSTER_LOG";

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Xml,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Xml => Self::Xml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "Load room and student data into SQLite and print it as JSON or XML")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long)]
    config: PathBuf,
    /// Output format.
    #[arg(long, value_enum)]
    format: CliOutputFormat,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries only the rendered document.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs schema setup, loading, and retrieval in order.
///
/// Each phase opens and releases its own connection. A failed phase is logged
/// and the next phase still runs; only an unreadable configuration stops the
/// run.
fn run(cli: Cli) -> Result<(), String> {
    let config = Config::load(&cli.config)
        .map_err(|e| format!("Failed to load configuration: {e}"))?;

    if let Err(err) = init_schema(&config.database) {
        tracing::error!("Failed to create schema and tables: {err}");
    }

    if let Err(err) = load_data(&config) {
        tracing::error!("Failed to load data: {err}");
    }

    match retrieve_and_render(&config.database, cli.format.into()) {
        Ok(document) => println!("{document}"),
        Err(err) => tracing::error!("Failed to retrieve data: {err}"),
    }

    Ok(())
}

fn init_schema(database: &DatabaseConfig) -> Result<(), String> {
    let mut store = Store::connect(database).map_err(|e| e.to_string())?;
    Migration::new(&mut store).up().map_err(|e| e.to_string())
}

fn load_data(config: &Config) -> Result<(), String> {
    let mut store = Store::connect(&config.database).map_err(|e| e.to_string())?;

    let rooms = read_rooms(&config.paths.rooms).map_err(|e| e.to_string())?;
    let students = read_students(&config.paths.students).map_err(|e| e.to_string())?;

    Loader::new(&mut store)
        .load(&rooms, &students)
        .map_err(|e| e.to_string())?;

    let status = Migration::new(&mut store)
        .status()
        .map_err(|e| e.to_string())?;
    tracing::info!(
        rooms = status.room_count,
        students = status.student_count,
        "row counts after load"
    );
    Ok(())
}

fn retrieve_and_render(database: &DatabaseConfig, format: OutputFormat) -> Result<String, String> {
    let rs = {
        let store = Store::connect(database).map_err(|e| e.to_string())?;
        retrieve(&store).map_err(|e| e.to_string())?
    };
    render(&rs, format).map_err(|e| format!("cannot render output: {e}"))
}
