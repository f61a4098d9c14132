//! Key-value header parsing for converted PHI text.
//!
//! Each line is split once on its first colon. Most keys keep the latest
//! non-empty value, but a few follow their own policy:
//!
//! - `AcqFileDate` is reduced to a padded `YYYYMMDD` token
//! - `SpectralRegDef`, `SpectralRegDef2` and `DepthCalDef` accumulate one
//!   whitespace-token array per occurrence
//! - `SpatialAreaDesc` keeps its last occurrence, even when empty
//! - `FileType` is ignored

use super::splitter::TextSegment;
use crate::constants::phi_keys;
use crate::error::{Result, XpsError};
use crate::models::{Header, Record, Value};
use tracing::debug;

/// Survey region code rewritten in `SpectralRegDef`
const SURVEY_CODE: &str = "Su1s";

pub fn parse_header(segment: &TextSegment, file: &str) -> Result<Header> {
    let mut record = Record::new();

    for (offset, line) in segment.lines.iter().enumerate() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            phi_keys::ACQ_FILE_DATE => {
                let date = compact_date(value).ok_or_else(|| {
                    XpsError::field_conversion(
                        file,
                        key,
                        segment.first_line + offset,
                        value,
                        "date (YYYY M D)",
                    )
                })?;
                record.insert(key, Value::Text(date));
            }
            key if phi_keys::TOKEN_ARRAYS.contains(&key) => {
                let mut tokens: Vec<String> =
                    value.split_whitespace().map(str::to_string).collect();
                if key == phi_keys::SPECTRAL_REG_DEF
                    && tokens.get(2).map(String::as_str) == Some(SURVEY_CODE)
                {
                    tokens[2] = "Survey".to_string();
                }
                let row = Value::text_list(tokens);
                let mut rows = match record.get(key) {
                    Some(Value::List(rows)) => rows.clone(),
                    _ => Vec::new(),
                };
                rows.push(row);
                record.insert(key, Value::List(rows));
            }
            phi_keys::SPATIAL_AREA_DESC => {
                record.insert(key, Value::text(value));
            }
            phi_keys::FILE_TYPE => {}
            _ => {
                if !value.is_empty() {
                    record.insert(key, Value::text(value));
                }
            }
        }
    }

    debug!("Parsed {} header keys from {}", record.len(), file);
    Ok(Header::new(record))
}

/// "2023 5 1 ..." to "20230501"
fn compact_date(value: &str) -> Option<String> {
    let mut parts = value.split_whitespace();
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    Some(format!("{}{:0>2}{:0>2}", year, month, day))
}

/// Token arrays accumulated under `key`, empty when absent
pub fn token_rows(header: &Header, key: &str) -> Vec<Vec<String>> {
    header
        .get(key)
        .and_then(Value::as_list)
        .map(|rows| {
            rows.iter()
                .filter_map(Value::as_list)
                .map(|tokens| tokens.iter().map(|t| t.to_string()).collect())
                .collect()
        })
        .unwrap_or_default()
}
