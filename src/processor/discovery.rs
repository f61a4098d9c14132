//! Input discovery for batch decoding
//!
//! Inputs may be plain files, directories searched recursively for known
//! suffixes, or glob patterns.

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::error::{Result, XpsError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery over a list of user supplied inputs
#[derive(Debug)]
pub struct FileDiscovery {
    inputs: Vec<PathBuf>,
}

impl FileDiscovery {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self { inputs }
    }

    /// Expand every input into concrete files, sorted and without duplicates
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if is_pattern(input) {
                files.extend(expand_pattern(input)?);
            } else if input.is_dir() {
                files.extend(walk_directory(input)?);
            } else if input.is_file() {
                files.push(input.clone());
            } else {
                return Err(XpsError::configuration(format!(
                    "Input does not exist: {}",
                    input.display()
                )));
            }
        }

        files.sort();
        files.dedup();
        debug!("Discovered {} input files", files.len());
        Ok(files)
    }
}

fn is_pattern(path: &Path) -> bool {
    path.to_string_lossy().contains(['*', '?', '['])
}

fn expand_pattern(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern).map_err(|e| {
        XpsError::configuration(format!("Invalid glob pattern '{}': {}", pattern, e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| XpsError::Io(e.into()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    debug!("Pattern '{}' matched {} files", pattern, files.len());
    Ok(files)
}

fn walk_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && has_supported_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    debug!("Found {} files under {}", files.len(), dir.display());
    Ok(files)
}

/// Known raw suffixes, compared case-insensitively
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
