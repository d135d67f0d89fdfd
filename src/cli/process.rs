//! Process command implementation

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, FileMatcher};
use crate::plugins::{HtmlContext, PluginManager};
use crate::utils::{format_duration, format_size_delta, relative_path};

/// Inject resource hints into generated HTML files
#[derive(Args, Debug)]
pub struct ProcessCommand {
    /// HTML files, or directories searched with the configured globs
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,
}

/// Outcome of processing a set of HTML files
#[derive(Debug, Default)]
pub struct ProcessSummary {
    /// Files read
    pub files: usize,

    /// Files whose content changed
    pub changed: Vec<PathBuf>,

    /// Total bytes before processing
    pub bytes_before: usize,

    /// Total bytes after processing
    pub bytes_after: usize,
}

impl ProcessCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let config = Config::discover(config_path)?;
        let matcher = config.process.matcher()?;
        let manager = PluginManager::from_config(&config);

        let files = collect_html_files(&self.paths, &matcher)?;
        if files.is_empty() {
            warn!("No HTML files matched {:?}", config.process.include);
        }

        eprintln!("{} Processing {} HTML file(s)...", "→".blue(), files.len());

        let summary = process_files(&manager, &files, self.dry_run).await?;
        let cwd = std::env::current_dir()?;

        for path in &summary.changed {
            let shown = relative_path(&cwd, path).unwrap_or_else(|| path.display().to_string());
            let verb = if self.dry_run { "would update" } else { "updated" };
            eprintln!("  {} {} {}", "•".dimmed(), shown.cyan(), verb.dimmed());
        }

        eprintln!(
            "\n{} {} of {} file(s) {} in {} ({})\n",
            "✓".green().bold(),
            summary.changed.len(),
            summary.files,
            if self.dry_run { "need hints" } else { "rewritten" },
            format_duration(start.elapsed()),
            format_size_delta(summary.bytes_before, summary.bytes_after)
        );

        Ok(())
    }
}

/// Run every HTML file through the plugin pipeline, writing back changes
/// unless `dry_run` is set
pub async fn process_files(
    manager: &PluginManager,
    files: &[PathBuf],
    dry_run: bool,
) -> Result<ProcessSummary> {
    let mut summary = ProcessSummary::default();

    for path in files {
        let html = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read HTML file: {}", path.display()))?;

        let output = manager.transform_index_html(&html, &HtmlContext::new(path))?;

        summary.files += 1;
        summary.bytes_before += html.len();
        summary.bytes_after += output.len();

        if output == html {
            debug!("Unchanged: {}", path.display());
            continue;
        }

        if !dry_run {
            tokio::fs::write(path, &output)
                .await
                .with_context(|| format!("Failed to write HTML file: {}", path.display()))?;
        }
        summary.changed.push(path.clone());
    }

    Ok(summary)
}

/// Expand the given paths into HTML files.
///
/// Files are taken as given; directories are walked in file-name order and
/// filtered by `matcher` on the path relative to the directory.
pub fn collect_html_files(paths: &[PathBuf], matcher: &FileMatcher) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to access {}", path.display()))?;

        if metadata.is_file() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
            if matcher.is_match(relative) {
                files.push(entry.into_path());
            }
        }
    }

    files.dedup();
    Ok(files)
}
