//! Batch decoding of instrument exports.
//!
//! Ties together input discovery, concurrent decoding and sidecar writing,
//! and prints a summary once the batch is done.

pub mod discovery;
pub mod streaming;
pub mod writer;

#[cfg(test)]
mod tests;

use self::{discovery::FileDiscovery, streaming::StreamingProcessor};

use crate::config::DecoderConfig;
use crate::error::Result;
use crate::models::ProcessingStats;

use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Decodes every file reachable from a set of inputs
#[derive(Debug)]
pub struct BatchProcessor {
    inputs: Vec<PathBuf>,
    config: DecoderConfig,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(inputs: Vec<PathBuf>, config: DecoderConfig) -> Self {
        Self {
            inputs,
            config,
            show_progress: true,
        }
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        info!(
            "Starting XPS decoding ({} exports, {} inputs)",
            self.config.manufacturer,
            self.inputs.len()
        );
        if self.config.write_outputs {
            info!("Writing sidecars to {}", self.config.output_dir.display());
        }

        let files = FileDiscovery::new(self.inputs.clone()).discover()?;
        info!("Found {} input files", files.len());

        let mut streaming = StreamingProcessor::new(self.config.clone());
        if !self.show_progress {
            streaming = streaming.without_progress();
        }
        let mut stats = streaming.process_files(&files).await;
        stats.processing_time_ms = start_time.elapsed().as_millis();

        info!(
            "Decoded {} files ({} failed) in {} ms",
            stats.files_processed, stats.files_failed, stats.processing_time_ms
        );
        Ok(stats)
    }
}

/// Print the end-of-batch summary
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Blocks decoded:".bright_cyan(),
        stats.total_blocks.to_string().bright_white().bold()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_white().bold()
        );
        for (path, reason) in &stats.failures {
            println!("    {} {}", path.display().to_string().red(), reason);
        }
    }
    if let Some(output_dir) = &stats.output_dir {
        println!("  {} {}", "Output:".bright_cyan(), output_dir.display());
    }
    println!(
        "  {} {:.2}s",
        "Time:".bright_cyan(),
        stats.processing_time_ms as f64 / 1000.0
    );
}
