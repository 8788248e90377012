//! tfbreak CLI entry point.
//!
//! This binary provides the command-line interface for tfbreak.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use tfbreak::cli::{Cli, Commands};
use tfbreak::{Config, Detector, TfBreakError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code when breaking changes were found.
const EXIT_BREAKING: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            let tfbreak_error = e.downcast_ref::<TfBreakError>();
            if tfbreak_error.is_some_and(TfBreakError::is_source_error) {
                eprintln!("\nNo comparison was made: fix the module sources and retry.");
            }

            let code = tfbreak_error.map_or(1, TfBreakError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,tfbreak={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Compare(args) => {
            config.merge_cli_args(&args);
            let detector = Detector::new(config.clone());

            let comparison = detector.compare_paths(&args.old, &args.new).await?;

            let reporter = tfbreak::reporter::Reporter::new(&config);
            let report = reporter.generate(&comparison, args.format)?;

            if let Some(output_path) = args.output {
                std::fs::write(&output_path, &report)?;
                tracing::info!(path = %output_path.display(), "Report written");
            } else {
                println!("{report}");
            }

            if comparison.has_breaking_changes() && !args.no_fail {
                Ok(ExitCode::from(EXIT_BREAKING))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        Commands::Init => {
            let config_path = Path::new("tfbreak.yaml");
            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: tfbreak.yaml");
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(args) => match Config::from_file(&args.file) {
            Ok(_) => {
                println!("Configuration is valid: {}", args.file.display());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Configuration error: {e}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        return Ok(Config::from_file(config_path)?);
    }

    let default_paths = ["tfbreak.yaml", "tfbreak.yml", ".tfbreak.yaml"];
    for path in default_paths.iter().map(Path::new) {
        if path.exists() {
            tracing::debug!(path = %path.display(), "Found configuration file");
            return Ok(Config::from_file(path)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
