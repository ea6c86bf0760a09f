use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_logoweave::{
    config::Config,
    pipeline::{Pipeline, PipelineOptions},
};

#[derive(Parser)]
#[command(name = "m3u-logoweave")]
#[command(version = "0.1.0")]
#[command(about = "Aggregates TV channel logos and injects them into M3U playlists")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Playlist to inject resolved logos into
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output path for the injected playlist
    #[arg(short, long, value_name = "FILE", default_value = "output_with_logos.m3u")]
    output: PathBuf,

    /// Skip downloading the logo asset directory
    #[arg(long)]
    skip_assets: bool,

    /// Skip Wikipedia fallback lookups
    #[arg(long)]
    skip_wikipedia: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = format!("m3u_logoweave={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting m3u-logoweave v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    let options = PipelineOptions {
        skip_assets: cli.skip_assets,
        skip_fallback: cli.skip_wikipedia,
        inject: cli.input.map(|input| (input, cli.output)),
    };

    let pipeline = Pipeline::new(config);
    let summary = pipeline.run(&options).await?;

    info!(
        "Done: {} logos resolved, {} channels aggregated",
        summary.resolved_logos, summary.channels
    );

    Ok(())
}
