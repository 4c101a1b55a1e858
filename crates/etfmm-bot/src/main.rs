//! Future/ETF market maker - replay entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Replay recorded venue events through the future/ETF market maker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ETFMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON-lines venue events to replay (`-` for stdin)
    #[arg(short, long)]
    input: Option<String>,

    /// Where to write JSON-lines order commands (`-` for stdout)
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    etfmm_telemetry::init_logging()?;

    info!("Starting etfmm-bot v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > ETFMM_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("ETFMM_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = etfmm_bot::AppConfig::from_file(&config_path)?.with_paths(args.input, args.output);
    info!(
        position_limit = config.quoter.position_limit,
        lot_size = config.quoter.lot_size,
        metrics_enabled = config.telemetry.metrics_enabled,
        "Configuration loaded"
    );

    let app = etfmm_bot::Application::new(config)?;
    let report = app.run().await?;

    info!(
        commands = report.commands_written,
        positions = ?report.positions,
        "Shutting down"
    );

    Ok(())
}
