use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use postcraft_core::config::PostcraftConfig;
use postcraft_infrastructure::ConfigService;
use postcraft_infrastructure::config_service::render_config;

use crate::bootstrap::AppContext;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a commented config template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Set one key, e.g. `webhook.calendar_url`. An empty value unsets it.
    Set { key: String, value: String },
}

/// Works without a readable config so a broken file can be replaced.
pub fn init(service: &ConfigService, force: bool) -> Result<()> {
    let path = service.init(force)?;
    println!("{} {}", "Wrote".bright_green(), path.display());
    Ok(())
}

/// Edits the file directly, so it also works while required keys are unset.
pub fn set(service: &ConfigService, key: &str, value: &str) -> Result<()> {
    let config = service.set(key, value)?;
    println!(
        "{} {} in {}",
        "Set".bright_green(),
        key.bold(),
        service.path().display()
    );
    print!("{}", render_config(&masked(&config))?);
    Ok(())
}

pub fn show(ctx: &AppContext) -> Result<()> {
    println!(
        "{}",
        format!("# {}", ctx.config_service.path().display()).bright_black()
    );
    print!("{}", render_config(&masked(&ctx.config))?);
    Ok(())
}

fn masked(config: &PostcraftConfig) -> PostcraftConfig {
    let mut config = config.clone();
    if let Some(key) = config.document_store.api_key.as_mut() {
        if !key.is_empty() {
            *key = "********".to_string();
        }
    }
    config
}
