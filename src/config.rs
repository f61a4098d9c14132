//! Configuration management and validation.
//!
//! Settings can come from a TOML file, for example:
//!
//! ```toml
//! manufacturer = "ulvac_phi"
//! converter = "/opt/phi/MPExport.exe"
//! use_wine = true
//! utc_offset_hours = 9
//! max_concurrent_files = 4
//! output_dir = "out"
//! ```
//!
//! Command-line flags are layered on top by the binary.

use crate::constants::DEFAULT_UTC_OFFSET_HOURS;
use crate::error::{Result, XpsError};
use crate::models::Manufacturer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for XPS decoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Instrument manufacturer, which picks the decoder family together
    /// with the file suffix
    pub manufacturer: Manufacturer,

    /// Native exporter for PHI binaries; without one a sibling `.txt` is read
    pub converter: Option<PathBuf>,

    /// Launch the exporter through wine
    pub use_wine: bool,

    /// Offset applied to measured dates, in hours east of UTC
    pub utc_offset_hours: i32,

    /// Maximum concurrent file decodes
    pub max_concurrent_files: usize,

    /// Write CSV and JSON sidecars for every decoded file
    pub write_outputs: bool,

    /// Destination of sidecars and converted text
    pub output_dir: PathBuf,

    /// Converter log directory, defaults to the output directory
    pub log_dir: Option<PathBuf>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            manufacturer: Manufacturer::ScientaOmicron,
            converter: None,
            use_wine: cfg!(not(windows)),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            max_concurrent_files: num_cpus::get(),
            write_outputs: true,
            output_dir: PathBuf::from("output"),
            log_dir: None,
        }
    }
}

impl DecoderConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            XpsError::configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| XpsError::configuration(format!("Failed to parse TOML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(XpsError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(XpsError::configuration(format!(
                "utc_offset_hours must lie within -12..=14, got {}",
                self.utc_offset_hours
            )));
        }
        Ok(())
    }

    pub fn with_manufacturer(mut self, manufacturer: Manufacturer) -> Self {
        self.manufacturer = manufacturer;
        self
    }

    pub fn with_converter(mut self, converter: impl Into<PathBuf>) -> Self {
        self.converter = Some(converter.into());
        self
    }

    pub fn with_wine(mut self, use_wine: bool) -> Self {
        self.use_wine = use_wine;
        self
    }

    pub fn with_utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_hours = hours;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Decode only, writing nothing
    pub fn without_outputs(mut self) -> Self {
        self.write_outputs = false;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Directory handed to the converter for its logs
    pub fn effective_log_dir(&self) -> &Path {
        self.log_dir.as_deref().unwrap_or(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.manufacturer, Manufacturer::ScientaOmicron);
        assert_eq!(config.utc_offset_hours, 9);
        assert!(config.max_concurrent_files >= 1);
        assert!(config.write_outputs);
        assert_eq!(config.effective_log_dir(), Path::new("output"));
    }

    #[test]
    fn test_parse_toml() {
        let config = DecoderConfig::from_toml(
            r#"
            manufacturer = "ulvac_phi"
            converter = "/opt/phi/MPExport.exe"
            use_wine = false
            utc_offset_hours = 0
            max_concurrent_files = 2
            log_dir = "logs"
            "#,
        )
        .unwrap();

        assert_eq!(config.manufacturer, Manufacturer::UlvacPhi);
        assert_eq!(config.converter, Some(PathBuf::from("/opt/phi/MPExport.exe")));
        assert!(!config.use_wine);
        assert_eq!(config.utc_offset_hours, 0);
        assert_eq!(config.max_concurrent_files, 2);
        assert_eq!(config.effective_log_dir(), Path::new("logs"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = DecoderConfig::from_toml("").unwrap();
        assert_eq!(config.manufacturer, DecoderConfig::default().manufacturer);
    }

    #[test]
    fn test_invalid_values() {
        assert!(DecoderConfig::from_toml("max_concurrent_files = 0").is_err());
        assert!(DecoderConfig::from_toml("utc_offset_hours = 30").is_err());
        assert!(DecoderConfig::from_toml("manufacturer = \"kratos\"").is_err());
    }

    #[test]
    fn test_builders() {
        let config = DecoderConfig::default()
            .with_manufacturer(Manufacturer::UlvacPhi)
            .with_converter("MPExport.exe")
            .with_wine(true)
            .with_max_concurrent_files(3)
            .with_output_dir("out")
            .without_outputs();

        assert_eq!(config.converter, Some(PathBuf::from("MPExport.exe")));
        assert_eq!(config.max_concurrent_files, 3);
        assert!(!config.write_outputs);
        assert_eq!(config.effective_log_dir(), Path::new("out"));
    }
}
