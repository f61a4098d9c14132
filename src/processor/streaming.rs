//! Concurrent decoding of many inputs
//!
//! Each file is decoded on the blocking pool, with the number of files in
//! flight bounded by the configuration. A failed file is counted and
//! logged but never stops the batch.

use crate::config::DecoderConfig;
use crate::decoder::decode_file;
use crate::error::Result;
use crate::models::ProcessingStats;
use crate::processor::writer::OutputWriter;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, error};

/// Outcome of one file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub blocks: usize,
    pub written: Vec<PathBuf>,
}

/// Streaming processor for batches of instrument exports
#[derive(Debug)]
pub struct StreamingProcessor {
    config: DecoderConfig,
    show_progress: bool,
}

impl StreamingProcessor {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Hide the progress bar, for tests and non-interactive runs
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Decode all files, writing sidecars when the configuration asks for them
    pub async fn process_files(&self, files: &[PathBuf]) -> ProcessingStats {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message("Decoding files");

        let concurrent_limit = self.config.max_concurrent_files.min(files.len()).max(1);
        debug!(
            "Decoding {} files with concurrency {}",
            files.len(),
            concurrent_limit
        );

        let stats = stream::iter(files)
            .map(|file_path| {
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = file_path.file_name() {
                        pb.set_message(format!("Decoding: {}", file_name.to_string_lossy()));
                    }
                    let result = self.process_single_file(file_path).await;
                    pb.inc(1);
                    (file_path, result)
                }
            })
            .buffer_unordered(concurrent_limit)
            .fold(ProcessingStats::default(), |mut stats, (file_path, result)| async move {
                match result {
                    Ok(outcome) => {
                        debug!(
                            "Decoded {} ({} blocks, {} outputs)",
                            outcome.path.display(),
                            outcome.blocks,
                            outcome.written.len()
                        );
                        stats.files_processed += 1;
                        stats.total_blocks += outcome.blocks;
                    }
                    Err(e) => {
                        error!("Failed to decode {}: {}", file_path.display(), e);
                        stats.files_failed += 1;
                        stats.failures.push((file_path.clone(), e.to_string()));
                    }
                }
                stats
            })
            .await;

        pb.finish_with_message("All files decoded");

        let mut stats = stats;
        stats.failures.sort();
        if self.config.write_outputs {
            stats.output_dir = Some(self.config.output_dir.clone());
        }
        stats
    }

    /// Decode one file on the blocking pool
    pub async fn process_single_file(&self, file_path: &Path) -> Result<FileOutcome> {
        let config = self.config.clone();
        let path = file_path.to_path_buf();

        task::spawn_blocking(move || -> Result<FileOutcome> {
            let decoded = decode_file(&path, &config)?;
            let written = if config.write_outputs {
                OutputWriter::new(&config.output_dir).write(&decoded)?
            } else {
                Vec::new()
            };
            Ok(FileOutcome {
                blocks: decoded.blocks.len(),
                path,
                written,
            })
        })
        .await
        .map_err(std::io::Error::other)?
    }
}
