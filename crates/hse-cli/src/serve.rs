//! # Serve Subcommand
//!
//! Runs the HTTP API server. Configuration merges three layers: the
//! `--port` flag and the `HSE_AUTH_SECRET` environment variable win
//! over `hse.yaml`, which wins over the built-in defaults. State is
//! in-memory; a restart starts from an empty system with authentication
//! governed by whatever secret is configured at that moment.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use hse_api::state::{AppConfig, AppState};

/// Listening port when neither the flag nor the file names one.
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "hse.yaml";

/// Arguments for the `hse serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on. Overrides the configuration file.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Server configuration as read from `hse.yaml`.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Listening port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Shared bearer secret. Absent means authentication is disabled
    /// and every request runs as the bootstrap administrator.
    #[serde(default)]
    pub auth_secret: Option<String>,
}

/// Parse one YAML configuration file. An empty file reads as empty
/// configuration rather than a YAML error.
pub fn read_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&raw)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Merge the flag, environment, and file layers into the server
/// configuration. Precedence: flag, then environment, then file, then
/// default.
pub fn effective_config(
    args: &ServeArgs,
    file: FileConfig,
    env_secret: Option<String>,
) -> AppConfig {
    AppConfig {
        port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
        auth_secret: env_secret.or(file.auth_secret),
    }
}

/// Execute the serve subcommand. Blocks until the server terminates.
pub fn run_serve(args: &ServeArgs, config_path: Option<&Path>) -> Result<u8> {
    // An explicit --config must exist; the implicit default may be absent.
    let file = match config_path {
        Some(path) => read_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_config(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => FileConfig::default(),
    };
    let config = effective_config(args, file, std::env::var("HSE_AUTH_SECRET").ok());
    if config.auth_secret.is_none() {
        tracing::warn!(
            "no auth secret configured; every request runs as the bootstrap administrator"
        );
    }

    let port = config.port;
    let state = AppState::with_config(config);
    let app = hse_api::app(state);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(async {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("HSE Declare API listening on {addr}");
        axum::serve(listener, app)
            .await
            .context("server terminated")?;
        Ok::<_, anyhow::Error>(())
    })?;
    Ok(0)
}
