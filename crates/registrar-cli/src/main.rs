//! registrar - check, normalize and store OFS registrar records.
//!
//! Decodes untyped JSON against the record schema by kind name, reports
//! invariant violations, and keeps validated collections as local snapshots.

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Args;
use commands::Paths;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // RUST_LOG controls the level, e.g. RUST_LOG=registrar_core=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args = Args::parse();
    debug!(command = ?args.command, "Starting");

    let paths = Paths::from_env()?;
    let mut stdout = io::stdout().lock();
    commands::run(args.command, &paths, &mut stdout)
}
