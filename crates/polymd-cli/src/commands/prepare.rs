use crate::cli::PrepareArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use polymd::{engine::progress::ProgressReporter, workflows};
use tracing::{info, warn};

pub async fn run(args: PrepareArgs, parallel: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let AppConfig {
        samples,
        core_config,
    } = build_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Preparing {} sample(s) under {}...",
        samples.len(),
        core_config.output_root.display()
    );
    info!("Invoking the core batch workflow...");

    let report = tokio::task::block_in_place(|| {
        workflows::batch::run(&samples, &core_config, parallel, &reporter)
    })?;

    for sample in report.succeeded() {
        println!(
            "✓ {} ({} repeat units/chain, {} -> {} atom types): {}",
            sample.name,
            sample.chain_length,
            sample.normalize.original_types,
            sample.normalize.canonical_types,
            sample.output_dir.display()
        );
    }
    for (name, error) in report.failed() {
        warn!("Sample '{}' failed: {}", name, error);
        eprintln!("✗ {}: {}", name, error);
    }

    let failed = report.failure_count();
    if failed > 0 {
        return Err(CliError::SamplesFailed {
            failed,
            total: report.outcomes.len(),
        });
    }
    Ok(())
}
