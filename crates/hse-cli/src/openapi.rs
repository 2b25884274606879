//! # OpenAPI Subcommand
//!
//! Emits the OpenAPI document the server serves at `/v1/openapi.json`,
//! for client generation and contract review without a running server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use utoipa::OpenApi;

use hse_api::openapi::ApiDoc;

/// Arguments for the `hse openapi` subcommand.
#[derive(Args, Debug)]
pub struct OpenapiArgs {
    /// Write the document here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute the openapi subcommand.
pub fn run_openapi(args: &OpenapiArgs) -> Result<u8> {
    let json = document()?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "OpenAPI document written");
        }
        None => println!("{json}"),
    }
    Ok(0)
}

/// The document as pretty-printed JSON.
pub fn document() -> Result<String> {
    serde_json::to_string_pretty(&ApiDoc::openapi())
        .context("failed to serialize the OpenAPI document")
}
