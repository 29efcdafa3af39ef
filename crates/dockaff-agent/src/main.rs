//! dockaff — ZDOCK docking, pose extraction and PRODIGY affinity scoring.
//! Entry point for the pipeline binary.

mod cli;
mod config;
mod summary;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging; stdout is kept for results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dockaff=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("dockaff starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    info!(
        "Receptor: {:?}, ligand: {:?}, poses: {}, output: {:?}",
        config.inputs.receptor,
        config.inputs.ligand,
        config.extraction.num_poses,
        config.extraction.output_dir
    );

    let pipeline = config.build_pipeline();
    let report = pipeline
        .run(&config.receptor(), &config.ligand(), config.extraction.num_poses)
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.records)?);
    } else {
        summary::print_summary(&report);
    }

    Ok(())
}
