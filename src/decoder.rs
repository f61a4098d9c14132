//! Decoder selection by manufacturer and file suffix.

use crate::config::DecoderConfig;
use crate::error::Result;
use crate::models::{DecodedFile, Manufacturer, SourceFormat};
use crate::phi::PhiDecoder;
use crate::phi::converter::ExternalConverter;
use crate::vamas::VamasDecoder;
use std::path::Path;
use tracing::debug;

/// Turns one input file into a [`DecodedFile`]
pub trait Decoder {
    fn format(&self) -> SourceFormat;

    /// Decode the whole file, or fail without partial output
    fn decode(&self, path: &Path) -> Result<DecodedFile>;
}

/// The decoder variant chosen for one input
#[derive(Debug, Clone)]
pub enum FormatDecoder {
    Vamas(VamasDecoder),
    Phi(PhiDecoder),
}

impl FormatDecoder {
    /// Pick the decoder for `path`, failing with `UnsupportedFormat` for an
    /// unknown manufacturer and suffix pair
    pub fn select(manufacturer: Manufacturer, path: &Path, config: &DecoderConfig) -> Result<Self> {
        let format = SourceFormat::select(manufacturer, path)?;
        debug!("Selected {:?} decoder for {}", format, path.display());

        let decoder = match format {
            SourceFormat::Vamas => FormatDecoder::Vamas(VamasDecoder::new(config.utc_offset_hours)),
            SourceFormat::PhiSpectrum | SourceFormat::PhiProfile | SourceFormat::PhiAngle => {
                let mut decoder = PhiDecoder::new(format, config.utc_offset_hours);
                if let Some(program) = &config.converter {
                    let converter = ExternalConverter::new(program, &config.output_dir)
                        .with_wine(config.use_wine)
                        .with_log_dir(config.effective_log_dir());
                    decoder = decoder.with_converter(converter);
                }
                FormatDecoder::Phi(decoder)
            }
        };
        Ok(decoder)
    }
}

impl Decoder for FormatDecoder {
    fn format(&self) -> SourceFormat {
        match self {
            FormatDecoder::Vamas(decoder) => decoder.format(),
            FormatDecoder::Phi(decoder) => decoder.format(),
        }
    }

    fn decode(&self, path: &Path) -> Result<DecodedFile> {
        match self {
            FormatDecoder::Vamas(decoder) => decoder.decode(path),
            FormatDecoder::Phi(decoder) => decoder.decode(path),
        }
    }
}

/// Decode one file with the decoder its manufacturer and suffix select
pub fn decode_file(path: &Path, config: &DecoderConfig) -> Result<DecodedFile> {
    FormatDecoder::select(config.manufacturer, path, config)?.decode(path)
}
