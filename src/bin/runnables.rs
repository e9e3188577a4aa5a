use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use runnables::{ColorChoice, Era, Overrides, RunConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Runnable Rust edition feature demos", long_about = None)]
struct Cli {
    /// Run only these editions (repeatable). Defaults to all of them.
    #[arg(long, value_enum)]
    era: Vec<Era>,

    /// Only run examples whose name contains the given string.
    #[arg(long)]
    filter: Option<String>,

    /// Load settings from a TOML file. Flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Color the OK/FAILED markers.
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Print a totals line at the end.
    #[arg(long)]
    summary: bool,

    /// Print the run summary as JSON after the report.
    #[arg(long)]
    json: bool,

    /// Enable tracing output to stderr.
    #[arg(long)]
    trace: bool,
}

fn install_subscriber(trace: bool) {
    if !trace {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_config(cli: Cli) -> Result<RunConfig, runnables::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    config.apply_overrides(Overrides {
        eras: cli.era,
        filter: cli.filter,
        color: cli.color,
        summary: cli.summary,
        json: cli.json,
    });
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_subscriber(cli.trace);

    let config = match resolve_config(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let summary = match runnables::run(&config, io::stdout()) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
