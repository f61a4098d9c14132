//! VAMAS (ISO 14976) text decoding.
//!
//! Decodes the global header and every block with the conditional rule
//! tables in [`schema`], then assembles the numeric table and classifies the
//! metadata. A file is decoded completely or not at all.

pub mod metadata;
pub mod rules;
pub mod schema;
pub mod series;

use crate::cursor::LineCursor;
use crate::decoder::Decoder;
use crate::error::Result;
use crate::models::{DecodedFile, SourceFormat};
use std::path::{Path, PathBuf};
use tracing::info;

/// Decoder for Scienta Omicron `.vms` files
#[derive(Debug, Clone)]
pub struct VamasDecoder {
    utc_offset_hours: i32,
}

impl VamasDecoder {
    pub fn new(utc_offset_hours: i32) -> Self {
        Self { utc_offset_hours }
    }

    /// Decode from an already open cursor
    pub fn decode_cursor(&self, cursor: &mut LineCursor, source: PathBuf) -> Result<DecodedFile> {
        let header = schema::decode_header(cursor)?;
        let blocks = schema::decode_blocks(cursor, &header)?;
        let table = series::assemble(&header, &blocks, cursor.file())?;
        let (constant, repeated) =
            metadata::classify(&header, &blocks, cursor.file(), self.utc_offset_hours)?;

        info!(
            "Decoded {}: {} blocks, {} columns x {} rows",
            cursor.file(),
            blocks.len(),
            table.width(),
            table.height()
        );

        Ok(DecodedFile {
            source,
            format: SourceFormat::Vamas,
            header,
            blocks,
            table,
            profile: None,
            species: Vec::new(),
            constant,
            repeated,
        })
    }

    /// Decode in-memory text under the given file name
    pub fn decode_text(&self, file: &str, text: &str) -> Result<DecodedFile> {
        let mut cursor = LineCursor::from_text(file, text);
        self.decode_cursor(&mut cursor, PathBuf::from(file))
    }
}

impl Default for VamasDecoder {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_UTC_OFFSET_HOURS)
    }
}

impl Decoder for VamasDecoder {
    fn format(&self) -> SourceFormat {
        SourceFormat::Vamas
    }

    fn decode(&self, path: &Path) -> Result<DecodedFile> {
        let mut cursor = LineCursor::open(path)?;
        self.decode_cursor(&mut cursor, path.to_path_buf())
    }
}

#[cfg(test)]
mod tests;
