//! series-sides CLI
//!
//! Resolves the sides of one series from a JSON document holding its
//! matches and external participants, and prints them as JSON. A document of
//! the form `{"series": [{"id": ..., "matches": ..., "participants": ...}]}`
//! resolves many series concurrently.

use std::path::PathBuf;
use std::process::ExitCode;

use serde::{Deserialize, Serialize};

use series_sides::gather::try_join_all;
use series_sides::{
    get_sides, ExternalParticipant, Match, SeriesId, Side, SidesConfig, SidesError, SidesResult,
};

/// CLI configuration
struct Config {
    /// Input document
    input: PathBuf,
    /// Optional config file
    config: Option<PathBuf>,
    /// Pretty-print output
    pretty: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    verbose: bool,
}

#[derive(Deserialize)]
struct SeriesInput {
    matches: Vec<Match>,
    #[serde(default)]
    participants: Vec<ExternalParticipant>,
}

#[derive(Deserialize)]
struct BatchEntry {
    id: SeriesId,
    #[serde(flatten)]
    input: SeriesInput,
}

#[derive(Deserialize)]
struct BatchInput {
    series: Vec<BatchEntry>,
}

#[derive(Serialize)]
struct BatchOutput {
    id: SeriesId,
    sides: Vec<Side>,
}

fn print_help() {
    println!("series-sides - resolve series participants from match data");
    println!();
    println!("USAGE:");
    println!("    series-sides --input <FILE> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -i, --input <FILE>        JSON document with `matches` and `participants`,");
    println!("                              or `series`: a list of such documents with an `id`");
    println!("    -c, --config <FILE>       JSON config file");
    println!("        --pretty              Pretty-print output");
    println!("    -v, --verbose             Debug logging (overridden by RUST_LOG)");
    println!("    -h, --help                Print help information");
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut input = None;
    let mut config_path = None;
    let mut pretty = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                if i + 1 < args.len() {
                    input = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("error: --input requires a value");
                    std::process::exit(1);
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("error: --config requires a value");
                    std::process::exit(1);
                }
            }
            "--pretty" => {
                pretty = true;
                i += 1;
            }
            "--verbose" | "-v" => {
                verbose = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    let Some(input) = input else {
        eprintln!("error: --input is required");
        std::process::exit(1);
    };
    Config {
        input,
        config: config_path,
        pretty,
        verbose,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> SidesResult<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

fn run(config: &Config) -> SidesResult<String> {
    let settings = match &config.config {
        Some(path) => SidesConfig::from_path(path)?,
        None => SidesConfig::default(),
    };
    log::debug!("using config {settings:?}");

    let raw = std::fs::read_to_string(&config.input)
        .map_err(|e| SidesError::internal(format!("read {}: {e}", config.input.display())))?;

    // Pick the document shape first, then parse it as that shape so errors
    // keep their field and position.
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    if document.get("series").is_none() {
        let input: SeriesInput = serde_json::from_str(&raw)?;
        log::info!(
            "resolving {} matches against {} participants",
            input.matches.len(),
            input.participants.len()
        );
        to_json(&get_sides(&input.matches, &input.participants), config.pretty)
    } else {
        let BatchInput { series } = serde_json::from_str(&raw)?;
        log::info!("resolving {} series", series.len());
        let tasks: Vec<_> = series
            .iter()
            .map(|entry| {
                move || -> SidesResult<BatchOutput> {
                    Ok(BatchOutput {
                        id: entry.id.clone(),
                        sides: get_sides(&entry.input.matches, &entry.input.participants),
                    })
                }
            })
            .collect();
        let outputs = try_join_all(tasks, settings.gather.max_concurrency)?;
        to_json(&outputs, config.pretty)
    }
}

fn main() -> ExitCode {
    let config = parse_args();
    init_logging(config.verbose);

    match run(&config) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
