use serde::Deserialize;
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gateway_position::{
    ConfigError, ConfigurationManager, CsvFormatter, DuplicateKeyFilter, EstimationError,
    GatewayObservation, JsonFormatter, OutputFormat, PositionFormatter, TextFormatter,
};

#[derive(Debug, Deserialize)]
struct ObservationsJson {
    gateways: Vec<GatewayObservation>,
}

/// Command-line failures; only `Usage` prints the usage text
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Estimation(#[from] EstimationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn usage(message: &str) -> CliError {
    CliError::Usage(message.to_string())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when subcommands run more than once in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} estimate <observations.json> [--config <file>] [--format text|json|csv]",
        program
    );
    eprintln!("   or: {} dedup <existing_keys.txt> <candidate_keys.txt>", program);
    eprintln!("   or: {} default-config <output.json>", program);
}

/// One key per line, trimmed, blank lines skipped
fn read_keys<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_estimate(args: &[String]) -> Result<(), CliError> {
    let json_path = args.first().ok_or_else(|| usage("missing observations file"))?;
    let mut config_path: Option<&String> = None;
    let mut format = OutputFormat::Text;

    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--config" => config_path = Some(rest.next().ok_or_else(|| usage("--config needs a file"))?),
            "--format" => {
                format = rest
                    .next()
                    .ok_or_else(|| usage("--format needs a value"))?
                    .parse()
                    .map_err(CliError::Usage)?
            }
            other => return Err(CliError::Usage(format!("unexpected argument '{}'", other))),
        }
    }

    let manager = match config_path {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    init_logging(manager.get_config().debug_logging);
    if let Some(path) = config_path {
        info!(path = %path, "using estimator configuration");
    }

    let json_data = std::fs::read_to_string(json_path)?;
    let observations: ObservationsJson = serde_json::from_str(&json_data)?;

    let (position, diagnostics) = manager
        .estimator()
        .estimate_with_diagnostics(&observations.gateways)?;

    let formatted = PositionFormatter::new().format(&position, &diagnostics);
    match format {
        OutputFormat::Text => print!("{}", TextFormatter::new().format_text(&formatted)),
        OutputFormat::Json => println!("{}", JsonFormatter::pretty().format_json(&formatted)?),
        OutputFormat::Csv => println!("{}", CsvFormatter::new().format_csv(&formatted)),
    }
    Ok(())
}

fn run_dedup(args: &[String]) -> Result<(), CliError> {
    if args.len() != 2 {
        return Err(usage("dedup needs <existing_keys.txt> <candidate_keys.txt>"));
    }
    init_logging(false);

    let filter = DuplicateKeyFilter::new(read_keys(&args[0])?);
    let screening = filter.screen(read_keys(&args[1])?);

    for key in &screening.accepted {
        println!("accepted\t{}", key);
    }
    for (key, reason) in &screening.rejected {
        println!("rejected\t{}\t{}", key, reason);
    }
    info!(
        accepted = screening.accepted.len(),
        rejected = screening.rejected.len(),
        "dedup complete"
    );
    Ok(())
}

fn run_default_config(args: &[String]) -> Result<(), CliError> {
    let path = args.first().ok_or_else(|| usage("default-config needs an output path"))?;
    init_logging(false);
    ConfigurationManager::new().save_to_file(path)?;
    info!(path = %path, "wrote default configuration");
    Ok(())
}

fn run(args: &[String]) -> Result<(), CliError> {
    match args.get(1).map(|s| s.as_str()) {
        Some("estimate") => run_estimate(&args[2..]),
        Some("dedup") => run_dedup(&args[2..]),
        Some("default-config") => run_default_config(&args[2..]),
        Some(other) => Err(CliError::Usage(format!("unknown command '{}'", other))),
        None => Err(usage("missing command")),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("gateway-position", |s| s.as_str());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(message)) => {
            eprintln!("Error: {}", message);
            print_usage(program);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
