//! Invocation of the native PHI exporter.
//!
//! The exporter turns a binary `.spe`, `.pro` or `.ang` file into key-value
//! text. On hosts other than Windows it runs under wine, which only accepts
//! backslash-separated paths.

use crate::constants::{PHI_CONVERTED_EXTENSION, WINE_PROGRAM};
use crate::error::{Result, XpsError};
use crate::models::SourceFormat;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ExternalConverter {
    program: PathBuf,
    use_wine: bool,
    output_dir: PathBuf,
    log_dir: PathBuf,
}

impl ExternalConverter {
    pub fn new(program: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            program: program.into(),
            use_wine: cfg!(not(windows)),
            log_dir: output_dir.clone(),
            output_dir,
        }
    }

    pub fn with_wine(mut self, use_wine: bool) -> Self {
        self.use_wine = use_wine;
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the converted text of `input` lands
    pub fn converted_path(&self, input: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        self.output_dir
            .join(format!("{}.{}", stem, PHI_CONVERTED_EXTENSION))
    }

    /// Build the exporter command line for `input`
    pub fn command(&self, input: &Path, format: SourceFormat) -> Command {
        let mut command = if self.use_wine {
            let mut wine = Command::new(WINE_PROGRAM);
            wine.arg(&self.program);
            wine
        } else {
            Command::new(&self.program)
        };

        command
            .arg(format!("-LogFolder:{}", self.host_path(&self.log_dir)))
            .arg(format!("-Filename:{}", self.host_path(input)))
            .arg(format!("-OutputFolder:{}", self.host_path(&self.output_dir)));

        if format.exports_profile() {
            command.arg("-ExportProfile");
        }
        command
    }

    /// Run the exporter and return the path of the converted text
    pub fn convert(&self, input: &Path, format: SourceFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;

        let mut command = self.command(input, format);
        debug!("Running converter: {:?}", command);

        let output = command.output()?;
        if !output.status.success() {
            let status = output.status.code().map_or_else(
                || "terminated by signal".to_string(),
                |code| format!("exit code {}", code),
            );
            return Err(XpsError::ConverterFailed {
                program: self.program.clone(),
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let converted = self.converted_path(input);
        if !converted.is_file() {
            return Err(XpsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("converter produced no {}", converted.display()),
            )));
        }

        info!("Converted {} to {}", input.display(), converted.display());
        Ok(converted)
    }

    fn host_path(&self, path: &Path) -> String {
        let text = path.display().to_string();
        if self.use_wine {
            text.replace('/', "\\")
        } else {
            text
        }
    }
}
