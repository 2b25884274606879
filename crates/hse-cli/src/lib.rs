//! # hse-cli — Command-Line Interface for HSE Declare
//!
//! Provides the `hse` binary: the HTTP API server plus the operator
//! introspection commands that answer "what will this deployment
//! allow" without starting it.
//!
//! ## Subcommands
//!
//! - `hse serve` — Run the HTTP API server.
//! - `hse matrix` — Print the role/status authorization table.
//! - `hse openapi` — Emit the OpenAPI document.
//!
//! ## Configuration
//!
//! `serve` reads `hse.yaml` from the working directory (or the file
//! named by `--config`). The `--port` flag and the `HSE_AUTH_SECRET`
//! environment variable take precedence over the file:
//!
//! ```bash
//! hse serve --port 8080
//! hse matrix --format json
//! hse openapi --out openapi.json
//! ```

pub mod matrix;
pub mod openapi;
pub mod serve;
