//! Ersatz mock server.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                    ERSATZ                     │
//!   definition tree     │  ┌─────────────┐        ┌────────────────┐   │
//!   ────────────────────┼─▶│ definitions │───────▶│    routing     │   │
//!   (startup, once)     │  │   loader    │        │    Registry    │   │
//!                       │  └─────────────┘        └───┬────────▲───┘   │
//!                       │                     lookup  │        │ vary  │
//!   Client Request      │  ┌─────────┐    ┌──────────▼─┐  ┌───┴────┐  │
//!   ────────────────────┼─▶│  http   │───▶│  dispatch  │  │control │◀─┼── POST /__ersatz
//!                       │  │ server  │    └──────┬─────┘  └────────┘  │
//!   Client Response     │  └─────────┘           │                    │
//!   ◀───────────────────┼────────────────────────┘ active variant     │
//!                       │                                              │
//!                       │  config · observability · lifecycle · admin  │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ersatz::config::{load_config, validate_config, ConfigError, ErsatzConfig};
use ersatz::lifecycle;
use ersatz::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "ersatz", version)]
#[command(about = "File-defined mock HTTP server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the endpoints defined under a directory
    Start {
        /// Port to listen on
        port: u16,

        /// Root of the definition tree
        definitions_dir: PathBuf,

        /// Host to bind (defaults to the config file's, else 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Optional TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match cli.command {
        Commands::Start {
            port,
            definitions_dir,
            host,
            config,
        } => {
            let config = match build_config(port, definitions_dir, host.as_deref(), config) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            if let Err(e) = init_logging(&config.observability) {
                eprintln!("Failed to initialize logging: {}", e);
            }
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "ersatz starting");

            if let Err(e) = lifecycle::run(config).await {
                tracing::error!(error = %e, "Startup failed");
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn build_config(
    port: u16,
    definitions_dir: PathBuf,
    host: Option<&str>,
    config_path: Option<PathBuf>,
) -> Result<ErsatzConfig, ConfigError> {
    let mut config = match config_path {
        Some(path) => load_config(&path)?,
        None => ErsatzConfig::default(),
    };
    config.apply_start_args(port, definitions_dir, host);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
