//! XPS Processor Library
//!
//! Decodes surface-analysis instrument exports into a normalized form:
//! a file header, per-block records, a wide numeric table and metadata
//! split into constant and repeated parts.
//!
//! Two families are supported:
//! - VAMAS text (`.vms`), whose fields appear or not depending on the
//!   experiment mode and technique of each block
//! - ULVAC-PHI binaries (`.spe`, `.pro`, `.ang`), converted to key-value
//!   text by the native exporter and split into spectrum and profile segments
//!
//! ```no_run
//! use std::path::Path;
//! use xps_processor::{DecoderConfig, decode_file};
//!
//! let decoded = decode_file(Path::new("survey.vms"), &DecoderConfig::default())?;
//! println!("{} blocks", decoded.blocks.len());
//! # Ok::<(), xps_processor::XpsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod cross;
pub mod cursor;
pub mod dates;
pub mod decoder;
pub mod error;
pub mod models;
pub mod numeric;
pub mod phi;
pub mod processor;
pub mod table;
pub mod vamas;

pub use config::DecoderConfig;
pub use cross::CrossExpander;
pub use decoder::{Decoder, FormatDecoder, decode_file};
pub use error::{Result, XpsError};
pub use models::{
    Block, ConstantMetadata, DecodedFile, Header, Manufacturer, ProcessingStats, Record,
    RepeatedMetadata, SourceFormat, Value,
};
pub use phi::PhiDecoder;
pub use processor::BatchProcessor;
pub use table::{NumericTable, SpeciesTables};
pub use vamas::VamasDecoder;
