use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod bootstrap;
mod clipboard;
mod commands;
mod logging;
mod render;
mod repl;

use bootstrap::AppContext;
use commands::calendar::CalendarAction;
use commands::config::ConfigAction;

#[derive(Parser)]
#[command(name = "postcraft", version)]
#[command(about = "Postcraft - draft, preview and schedule social posts", long_about = None)]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true, env = "POSTCRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// Also log to stderr, at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell (default)
    Shell,
    /// Content calendar
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
    /// Upload an image and print its URL
    Upload { path: PathBuf },
    /// Check document store read/write permissions
    Probe,
    /// Manage config.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = bootstrap::resolve_paths()?;
    logging::init(&paths.logs_dir(), cli.verbose)?;

    let command = cli.command.unwrap_or(Commands::Shell);
    match command {
        Commands::Config {
            action: ConfigAction::Init { force },
        } => {
            return commands::config::init(&bootstrap::config_service(&paths, cli.config), force);
        }
        Commands::Config {
            action: ConfigAction::Set { key, value },
        } => {
            let service = bootstrap::config_service(&paths, cli.config);
            return commands::config::set(&service, &key, &value);
        }
        _ => {}
    }

    let ctx = AppContext::load(paths, cli.config)?;
    tracing::debug!(config = %ctx.config_service.path().display(), "Starting postcraft");

    match command {
        Commands::Shell => repl::run(&ctx).await?,
        Commands::Calendar { action } => commands::calendar::run(&ctx, action).await?,
        Commands::Upload { path } => commands::upload::run(&ctx, &path).await?,
        Commands::Probe => commands::probe::run(&ctx).await?,
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => {
                commands::config::init(&ctx.config_service, force)?
            }
            ConfigAction::Show => commands::config::show(&ctx)?,
            ConfigAction::Set { key, value } => {
                commands::config::set(&ctx.config_service, &key, &value)?
            }
        },
    }

    Ok(())
}
