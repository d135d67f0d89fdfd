//! Config initialization command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::{default_config_toml, CONFIG_FILE};

/// Write a default hintweave.toml
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Directory to write the config into
    #[arg(default_value = ".")]
    pub dir: String,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub async fn execute(&self) -> Result<()> {
        let dir = Path::new(&self.dir);
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            );
        }

        fs::create_dir_all(dir).context("Failed to create config directory")?;
        fs::write(&config_path, default_config_toml())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        eprintln!("  {} Created {}", "✓".green(), config_path.display().to_string().cyan());
        eprintln!();
        eprintln!("  Next steps:");
        eprintln!("    {} hintweave process dist", "→".dimmed());
        eprintln!();

        Ok(())
    }
}
