//! Hintweave - post-build resource hints for frontend bundles
//!
//! Rewrites the HTML a bundler generates so the browser fetches the vendor
//! chunk and critical scripts first, and reports the code-splitting policy
//! that decides which chunk each module lands in.
//!
//! # Features
//! - modulepreload/prefetch hint injection
//! - Stylesheet link cleanup (crossorigin, duplicate style preloads)
//! - Path-based manual chunk policy with user rules

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hintweave_lib::Cli;

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("hintweave=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("hintweave=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    cli.execute().await
}
