//! # hse CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hse_cli::matrix::{run_matrix, MatrixArgs};
use hse_cli::openapi::{run_openapi, OpenapiArgs};
use hse_cli::serve::{run_serve, ServeArgs};

/// HSE Declare — extra-duty-hour declarations for French schools.
///
/// Runs the HTTP API server and provides operator introspection over
/// the authorization matrix and the OpenAPI document.
#[derive(Parser, Debug)]
#[command(name = "hse", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file (defaults to hse.yaml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),

    /// Print the role/status authorization table.
    Matrix(MatrixArgs),

    /// Emit the OpenAPI document.
    Openapi(OpenapiArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("hse CLI starting");

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args, cli.config.as_deref()),
        Commands::Matrix(args) => run_matrix(&args),
        Commands::Openapi(args) => run_openapi(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
