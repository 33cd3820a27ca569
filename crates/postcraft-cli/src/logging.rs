//! Tracing subscriber setup.
//!
//! Logs go to a daily rolling file under the data directory so they never
//! interleave with REPL output. `--verbose` adds a stderr layer.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

const LOG_FILE_PREFIX: &str = "postcraft.log";

const TARGETS: &[&str] = &[
    "postcraft",
    "postcraft_core",
    "postcraft_infrastructure",
    "postcraft_interaction",
    "postcraft_application",
    "postcraft_cli",
];

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn init(logs_dir: &Path, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);
    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
