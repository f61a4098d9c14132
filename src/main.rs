use anyhow::Context;
use clap::Parser;
use std::process;
use xps_processor::cli::{Args, setup_logging};
use xps_processor::processor::{BatchProcessor, print_summary};

fn main() {
    let args = Args::parse();
    setup_logging(args.log_level());

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    });

    match result {
        Ok(failed) if failed > 0 => process::exit(2),
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Decode every input and report; returns the number of failed files
async fn run(args: Args) -> anyhow::Result<usize> {
    let config = args
        .to_config()
        .context("Failed to build configuration")?;

    let stats = BatchProcessor::new(args.inputs.clone(), config)
        .process()
        .await
        .context("Batch decoding failed")?;

    print_summary(&stats);
    Ok(stats.files_failed)
}
