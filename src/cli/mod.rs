//! Command-line interface for Hintweave
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `process`: Rewrite generated HTML with resource hints
//! - `chunks`: Show the chunk each module is assigned to
//! - `init`: Write a default config file

mod chunks;
mod init;
mod process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::CONFIG_FILE;

pub use chunks::ChunksCommand;
pub use init::InitCommand;
pub use process::{collect_html_files, ProcessCommand, ProcessSummary};

/// Hintweave - resource hints and code-splitting policy for built frontends
#[derive(Parser, Debug)]
#[command(name = "hintweave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to hintweave.toml config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inject resource hints into generated HTML files
    Process(ProcessCommand),

    /// Print the output chunk for module paths
    Chunks(ChunksCommand),

    /// Write a default hintweave.toml
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Process(cmd) => cmd.execute(&self.config).await,
            Commands::Chunks(cmd) => cmd.execute(&self.config).await,
            Commands::Init(cmd) => cmd.execute().await,
        }
    }
}

/// Print the Hintweave banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "⚡".cyan(),
        "Hintweave".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
