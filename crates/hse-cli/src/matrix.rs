//! # Matrix Subcommand
//!
//! Prints the role/status authorization table: which role may move a
//! session from which status to which. The table is the single
//! authority the gate consults, so this command is how an operator
//! checks what a deployment will and will not allow before anyone
//! files a declaration.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hse_core::Role;
use hse_state::{entries, MatrixEntry};

/// Arguments for the `hse matrix` subcommand.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Matrix output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Text,
    /// Machine-readable row list.
    Json,
}

/// Execute the matrix subcommand.
pub fn run_matrix(args: &MatrixArgs) -> Result<u8> {
    let rows = entries();
    match args.format {
        OutputFormat::Text => print!("{}", render_text(&rows)),
        OutputFormat::Json => println!("{}", render_json(&rows)?),
    }
    Ok(0)
}

/// The table as indented text. Every role is listed, including the ones
/// holding no status authority; an omitted role would read as an
/// oversight rather than a decision.
pub fn render_text(rows: &[MatrixEntry]) -> String {
    let mut out = String::new();
    for role in Role::ALL {
        out.push_str(role.as_str());
        out.push('\n');
        let role_rows: Vec<&MatrixEntry> = rows.iter().filter(|r| r.role == role).collect();
        if role_rows.is_empty() {
            out.push_str("  (no status authority)\n");
            continue;
        }
        for row in role_rows {
            let targets: Vec<&str> = row.targets.iter().map(|t| t.as_str()).collect();
            out.push_str(&format!(
                "  {:<18} -> {}\n",
                row.from.as_str(),
                targets.join(", ")
            ));
        }
    }
    out
}

/// The table as pretty-printed JSON.
pub fn render_json(rows: &[MatrixEntry]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("failed to serialize the matrix")
}
