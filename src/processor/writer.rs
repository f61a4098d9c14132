//! Sidecar writing for decoded files
//!
//! Every numeric table goes to CSV through polars, and the metadata of a
//! file goes to one pretty-printed JSON document. VAMAS sources also get
//! their header and blocks back as `key=value` text. Missing samples are
//! written as empty cells.

use crate::constants::{
    COUNTS_SUFFIX, METADATA_SUFFIX, VAMAS_TEXT_BLOCK_DATA, VAMAS_TEXT_BLOCK_INFO,
    VAMAS_TEXT_EXTENSION, VAMAS_TEXT_HEADER,
};
use crate::cursor::sanitize;
use crate::error::Result;
use crate::models::{
    Block, ConstantMetadata, DecodedFile, Header, Record, RepeatedMetadata, SourceFormat,
};
use crate::table::NumericTable;
use polars::prelude::{CsvWriter, SerWriter};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata document written next to the tables
#[derive(Debug, Serialize)]
struct MetadataDocument<'a> {
    source: &'a Path,
    format: SourceFormat,
    header: &'a Header,
    blocks: &'a [Block],
    constant: &'a ConstantMetadata,
    repeated: &'a RepeatedMetadata,
}

/// Writes CSV and JSON sidecars into one directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write all sidecars of `decoded`, returning the paths written
    ///
    /// For a source `name.ext` the files are:
    /// - `name.csv` with the wide numeric table
    /// - `name_profile.csv` with the depth profile, when there is one
    /// - `name_<species>.csv` and `name_<species>_count.csv` per species
    /// - `name.metadata.json`
    /// - `name.txt` with the reconstructed text of a VAMAS source
    pub fn write(&self, decoded: &DecodedFile) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)?;
        let stem = decoded
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "decoded".to_string());

        let mut written = Vec::new();

        if !decoded.table.is_empty() {
            written.push(self.write_table(&decoded.table, &format!("{}.csv", stem))?);
        }
        if let Some(profile) = &decoded.profile {
            written.push(self.write_table(profile, &format!("{}_profile.csv", stem))?);
        }
        for species in &decoded.species {
            let name = file_safe(&species.name);
            written.push(self.write_table(&species.cps, &format!("{}_{}.csv", stem, name))?);
            if let Some(counts) = &species.counts {
                written.push(self.write_table(
                    counts,
                    &format!("{}_{}_{}.csv", stem, name, COUNTS_SUFFIX),
                )?);
            }
        }

        written.push(self.write_metadata(decoded, &format!("{}.{}", stem, METADATA_SUFFIX))?);
        if decoded.format == SourceFormat::Vamas {
            written.push(
                self.write_vamas_text(decoded, &format!("{}.{}", stem, VAMAS_TEXT_EXTENSION))?,
            );
        }

        debug!(
            "Wrote {} sidecars for {}",
            written.len(),
            decoded.source.display()
        );
        Ok(written)
    }

    fn write_table(&self, table: &NumericTable, file_name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let mut frame = table.frame().clone();
        let file = BufWriter::new(File::create(&path)?);
        CsvWriter::new(file).include_header(true).finish(&mut frame)?;
        Ok(path)
    }

    fn write_metadata(&self, decoded: &DecodedFile, file_name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let document = MetadataDocument {
            source: &decoded.source,
            format: decoded.format,
            header: &decoded.header,
            blocks: &decoded.blocks,
            constant: &decoded.constant,
            repeated: &decoded.repeated,
        };
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(file, &document)?;
        Ok(path)
    }

    /// Write the header and every block back as `key=value` text
    ///
    /// Each block gets an info section with its fields and a data section
    /// with its ordinate values, channel after channel. Sentinel values and
    /// missing samples are left blank.
    pub fn write_vamas_text(&self, decoded: &DecodedFile, file_name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let mut out = BufWriter::new(File::create(&path)?);

        writeln!(out, "{}", VAMAS_TEXT_HEADER)?;
        write_fields(&mut out, decoded.header.fields())?;

        for (index, block) in decoded.blocks.iter().enumerate() {
            writeln!(out, "{} {}", VAMAS_TEXT_BLOCK_INFO, index + 1)?;
            write_fields(&mut out, &block.fields)?;

            writeln!(out, "{} {}", VAMAS_TEXT_BLOCK_DATA, index + 1)?;
            for channel in &block.ordinate_values {
                for sample in channel {
                    match sample {
                        Some(value) => writeln!(out, "{:?}", value)?,
                        None => writeln!(out)?,
                    }
                }
            }
        }

        out.flush()?;
        Ok(path)
    }
}

fn write_fields(out: &mut impl Write, fields: &Record) -> std::io::Result<()> {
    for (name, value) in fields.iter() {
        let rendered = value.to_string();
        writeln!(out, "{}={}", name, sanitize(rendered.trim_end_matches(['\r', '\n'])))?;
    }
    Ok(())
}

/// Species names can carry characters that are not valid in file names
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
