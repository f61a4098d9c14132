//! Block segments of converted PHI text.
//!
//! A segment opens with a comma-separated line of field names ending in
//! `//`. One value line follows per name, then comma-separated numeric rows
//! until the next segment.

use super::splitter::TextSegment;
use crate::constants::phi_keys;
use crate::cursor::sanitize;
use crate::error::{Result, XpsError};
use crate::models::{Block, Record, Value};

/// One parsed block segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub fields: Record,
    /// Numeric rows as written, one entry per comma-separated cell
    pub rows: Vec<Vec<Option<f64>>>,
    /// Whether the x axis is a sputter or angle axis
    pub is_profile: bool,
}

impl Segment {
    pub fn parse(segment: &TextSegment, file: &str) -> Result<Self> {
        let Some(name_line) = segment.lines.first() else {
            return Err(XpsError::unexpected_eof(file, "segment names", segment.first_line));
        };
        let names: Vec<&str> = name_line.strip_suffix("//").unwrap_or(name_line).split(',').collect();

        let mut fields = Record::new();
        for (index, name) in names.iter().enumerate() {
            let value = segment.lines.get(1 + index).ok_or_else(|| {
                XpsError::unexpected_eof(file, *name, segment.first_line + 1 + index)
            })?;
            fields.insert(*name, Value::text(value.as_str()));
        }

        let first_row = 1 + names.len();
        let mut rows = Vec::new();
        for (offset, line) in segment.lines.iter().enumerate().skip(first_row) {
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .map(|cell| parse_cell(cell, file, segment.first_line + offset))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        let is_profile = fields
            .text(phi_keys::X_LABEL)
            .is_some_and(|label| phi_keys::PROFILE_PREFIXES.iter().any(|p| label.starts_with(p)));

        Ok(Self {
            fields,
            rows,
            is_profile,
        })
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    /// Species name of the segment, empty when the export omits it
    pub fn species(&self) -> &str {
        self.text(phi_keys::ATOMIC_NAME).unwrap_or_default()
    }

    /// Widest row, which fixes the column count of the segment
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Values of column `index`, null where a row is short
    pub fn column(&self, index: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(index).copied().flatten())
            .collect()
    }

    /// Column-major view of the numeric rows
    pub fn columns(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.width()).map(|index| self.column(index)).collect()
    }

    pub fn into_block(self) -> Block {
        let columns = self.columns();
        Block::new(self.fields, columns)
    }
}

fn parse_cell(cell: &str, file: &str, line: usize) -> Result<Option<f64>> {
    let token = sanitize(cell.trim());
    if token.is_empty() {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| XpsError::field_conversion(file, "numeric row", line, token, "number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phi::splitter::split_segments;

    fn segment(text: &str) -> Result<Segment> {
        let segments = split_segments(text, "//Area Comment");
        Segment::parse(&segments[1], "s.txt")
    }

    #[test]
    fn test_names_values_and_rows() {
        let text = "Header: 1\n\
                    //Area Comment,AtomicName,XLabel,YLabel//\n\
                    area 1\n\
                    C1s\n\
                    Binding Energy(eV),reverse\n\
                    Intensity(c/s)\n\
                    295.0,10,11\n\
                    \n\
                    294.9,12,1E+37\n";
        let parsed = segment(text).unwrap();

        assert_eq!(parsed.species(), "C1s");
        assert_eq!(parsed.text("//Area Comment"), Some("area 1"));
        assert!(!parsed.is_profile);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1], vec![Some(294.9), Some(12.0), None]);
        assert_eq!(parsed.column(0), vec![Some(295.0), Some(294.9)]);

        let block = parsed.into_block();
        assert_eq!(block.channel_count(), 3);
        assert_eq!(block.samples_per_channel(), 2);
    }

    #[test]
    fn test_sputter_axis_is_profile() {
        let text = "//Area Comment,AtomicName,XLabel//\na\nO1s\nSputter Time(min)\n0,5\n";
        assert!(segment(text).unwrap().is_profile);

        let text = "//Area Comment,AtomicName,XLabel//\na\nO1s\nAngle(deg)\n";
        assert!(segment(text).unwrap().is_profile);
    }

    #[test]
    fn test_missing_value_line_is_fatal() {
        let text = "//Area Comment,AtomicName,XLabel//\na\nO1s\n";
        assert!(matches!(
            segment(text),
            Err(XpsError::UnexpectedEndOfFile { field, line: 4, .. }) if field == "XLabel"
        ));
    }

    #[test]
    fn test_non_numeric_cell_is_fatal() {
        let text = "//Area Comment,XLabel//\na\nBE(eV)\n1.0,abc\n";
        assert!(matches!(
            segment(text),
            Err(XpsError::FieldConversion { line: 4, .. })
        ));
    }
}
