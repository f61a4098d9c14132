//! Command-line interface components.

use crate::config::DecoderConfig;
use crate::error::Result;
use crate::models::Manufacturer;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "xps_processor")]
#[command(about = "Decode VAMAS and ULVAC-PHI surface-analysis exports into tables and metadata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Files, directories or glob patterns to decode
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Instrument manufacturer (scienta_omicron, ulvac_phi)
    #[arg(short, long, value_parser = parse_manufacturer)]
    pub manufacturer: Option<Manufacturer>,

    /// Output directory for CSV and JSON sidecars
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Native PHI exporter used to turn binaries into text
    #[arg(long)]
    pub converter: Option<PathBuf>,

    /// Run the exporter directly instead of through wine
    #[arg(long)]
    pub no_wine: bool,

    /// Maximum files decoded at once
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Offset of measured dates in hours east of UTC
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    /// Decode and report only, writing no sidecars
    #[arg(long)]
    pub no_output: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the effective configuration: defaults, then the TOML file, then flags
    pub fn to_config(&self) -> Result<DecoderConfig> {
        let mut config = match &self.config {
            Some(path) => DecoderConfig::from_file(path)?,
            None => DecoderConfig::default(),
        };

        if let Some(manufacturer) = self.manufacturer {
            config = config.with_manufacturer(manufacturer);
        }
        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_dir(output_dir);
        }
        if let Some(converter) = &self.converter {
            config = config.with_converter(converter);
        }
        if self.no_wine {
            config = config.with_wine(false);
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_files(jobs);
        }
        if let Some(hours) = self.utc_offset {
            config = config.with_utc_offset_hours(hours);
        }
        if self.no_output {
            config = config.without_outputs();
        }

        config.validate()?;
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

fn parse_manufacturer(name: &str) -> std::result::Result<Manufacturer, String> {
    Manufacturer::parse(name).ok_or_else(|| {
        format!(
            "unknown manufacturer '{}', expected one of: {}, {}",
            name,
            Manufacturer::ScientaOmicron,
            Manufacturer::UlvacPhi
        )
    })
}

/// Set up structured logging on stderr
pub fn setup_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xps_processor={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", level);
}
