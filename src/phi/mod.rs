//! ULVAC-PHI exports converted to key-value text.
//!
//! A binary `.spe`, `.pro` or `.ang` file is first turned into text by the
//! native exporter. The text opens with a `key: value` header, followed by
//! one segment per spectrum or profile, each starting with `//Area Comment`.

pub mod converter;
pub mod header;
pub mod labels;
pub mod metadata;
pub mod segment;
pub mod splitter;
pub mod tables;

use crate::constants::{PHI_CONVERTED_EXTENSION, PHI_SEGMENT_SEPARATOR, phi_keys};
use crate::cursor::read_text;
use crate::decoder::Decoder;
use crate::error::{Result, XpsError};
use crate::models::{DecodedFile, SourceFormat};
use crate::table::NumericTable;
use converter::ExternalConverter;
use labels::AxisLabel;
use segment::Segment;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PhiDecoder {
    format: SourceFormat,
    converter: Option<ExternalConverter>,
    utc_offset_hours: i32,
}

impl PhiDecoder {
    pub fn new(format: SourceFormat, utc_offset_hours: i32) -> Self {
        Self {
            format,
            converter: None,
            utc_offset_hours,
        }
    }

    pub fn with_converter(mut self, converter: ExternalConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Locate or produce the converted text for a raw export
    pub fn converted_text(&self, path: &Path) -> Result<PathBuf> {
        if let Some(converter) = &self.converter {
            return converter.convert(path, self.format);
        }

        let sibling = path.with_extension(PHI_CONVERTED_EXTENSION);
        if sibling.is_file() {
            warn!(
                "No converter configured, reading existing {}",
                sibling.display()
            );
            return Ok(sibling);
        }
        Err(XpsError::configuration(format!(
            "{} needs the PHI exporter, but no converter is configured and {} does not exist",
            path.display(),
            sibling.display()
        )))
    }

    /// Decode already converted text, reporting it as `source`
    pub fn decode_converted(&self, source: &Path, text_path: &Path) -> Result<DecodedFile> {
        let text = read_text(text_path)?;
        let file = text_path.display().to_string();
        self.decode_text(source.to_path_buf(), &file, &text)
    }

    pub fn decode_text(&self, source: PathBuf, file: &str, text: &str) -> Result<DecodedFile> {
        let text_segments = splitter::split_segments(text, PHI_SEGMENT_SEPARATOR);
        let (header_segment, block_segments) = text_segments
            .split_first()
            .ok_or_else(|| XpsError::unexpected_eof(file, "header", 1))?;

        let mut header = header::parse_header(header_segment, file)?;
        let segments = block_segments
            .iter()
            .map(|segment| Segment::parse(segment, file))
            .collect::<Result<Vec<_>>>()?;

        for segment in &segments {
            if segment.is_profile {
                if let Some(x) = segment.text(phi_keys::X_LABEL) {
                    AxisLabel::parse(x).merge_into(&mut header, 'z');
                }
            } else {
                if let Some(x) = segment.text(phi_keys::X_LABEL) {
                    AxisLabel::parse(x).merge_into(&mut header, 'x');
                }
                if let Some(y) = segment.text(phi_keys::Y_LABEL) {
                    AxisLabel::parse(y).merge_into(&mut header, 'y');
                }
            }
        }

        let (profile, z_values) = if self.format.exports_profile() {
            let profile = tables::profile_table(&segments, &header, file)?;
            (Some(profile.table), Some(profile.z_values))
        } else {
            (None, None)
        };

        let species = segments
            .iter()
            .filter(|segment| !segment.is_profile)
            .map(|segment| tables::species_tables(segment, &header, z_values.as_deref(), file))
            .collect::<Result<Vec<_>>>()?;

        let table = if species.is_empty() {
            NumericTable::empty()
        } else {
            NumericTable::hconcat(species.iter().map(|s| s.cps.clone()).collect())?
        };

        let (constant, repeated) = metadata::classify(&header, file, self.utc_offset_hours)?;
        let blocks = segments.into_iter().map(Segment::into_block).collect::<Vec<_>>();

        info!(
            "Decoded {}: {} segments, {} species tables",
            file,
            blocks.len(),
            species.len()
        );

        Ok(DecodedFile {
            source,
            format: self.format,
            header,
            blocks,
            table,
            profile,
            species,
            constant,
            repeated,
        })
    }
}

impl Decoder for PhiDecoder {
    fn format(&self) -> SourceFormat {
        self.format
    }

    fn decode(&self, path: &Path) -> Result<DecodedFile> {
        let text_path = self.converted_text(path)?;
        self.decode_converted(path, &text_path)
    }
}
