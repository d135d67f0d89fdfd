//! Chunks command implementation

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::bundler::{plan_chunks, ChunkPlan, DEFAULT_CHUNK};
use crate::config::Config;
use crate::plugins::PluginManager;

/// Print the output chunk for module paths
#[derive(Args, Debug)]
pub struct ChunksCommand {
    /// Resolved module paths; read from stdin, one per line, when omitted
    pub module_ids: Vec<String>,

    /// Print the grouped chunk plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChunksCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        info!("Loading configuration from {}", config_path);
        let config = Config::discover(config_path)?;
        if !config.chunks.enabled {
            warn!("Chunk policy disabled in config; every module uses default grouping");
        }

        let manager = PluginManager::from_config(&config);

        let ids = if self.module_ids.is_empty() {
            read_stdin_lines().await?
        } else {
            self.module_ids.clone()
        };

        let plan = plan_chunks(|id| manager.manual_chunks(id), ids.iter().map(String::as_str));

        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            return Ok(());
        }

        for id in &ids {
            println!("{} -> {}", id, chunk_label(&plan, id));
        }

        eprintln!(
            "\n{} {} module(s) in {} manual chunk(s)\n",
            "✓".green().bold(),
            plan.module_count(),
            plan.names().len()
        );

        Ok(())
    }
}

fn chunk_label<'a>(plan: &'a ChunkPlan, id: &str) -> &'a str {
    plan.chunk_for(id).map_or(DEFAULT_CHUNK, |chunk| chunk.name.as_str())
}

async fn read_stdin_lines() -> Result<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ids = Vec::new();

    while let Some(line) = lines.next_line().await.context("Failed to read module ids from stdin")? {
        let line = line.trim();
        if !line.is_empty() {
            ids.push(line.to_string());
        }
    }

    Ok(ids)
}
