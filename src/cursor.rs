//! Text loading and sequential line reading.
//!
//! Input files carry no declared encoding, so bytes are decoded by sniffing:
//! a byte-order mark wins, then strict UTF-8, then Shift_JIS, and finally
//! windows-1252 which accepts any byte sequence.

use crate::constants::SENTINEL_PATTERN;
use crate::error::{Result, XpsError};
use encoding_rs::{Encoding, SHIFT_JIS, WINDOWS_1252};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static SENTINEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{})$", SENTINEL_PATTERN)).expect("sentinel pattern is valid")
});

/// Replace a float-overflow sentinel token with the empty string
///
/// Only tokens that match the sentinel completely are replaced.
pub fn sanitize(token: &str) -> &str {
    if SENTINEL.is_match(token) { "" } else { token }
}

/// Read a file and decode it with the detected encoding
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let (text, encoding) = decode_bytes(&bytes);
    debug!("Decoded {} as {}", path.display(), encoding);
    Ok(text)
}

/// Decode raw bytes, returning the text and the encoding name used
pub fn decode_bytes(bytes: &[u8]) -> (String, &'static str) {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return (text.into_owned(), encoding.name());
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), "UTF-8");
    }

    if let Some(text) = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes) {
        return (text.into_owned(), SHIFT_JIS.name());
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    (text.into_owned(), WINDOWS_1252.name())
}

/// Forward-only reader over the lines of one file
///
/// Running past the last line is fatal and reports the field that was being
/// read together with its 1-based line number.
#[derive(Debug)]
pub struct LineCursor {
    file: String,
    lines: Vec<String>,
    position: usize,
}

impl LineCursor {
    pub fn open(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(file, &text))
    }

    pub fn from_text(file: impl Into<String>, text: &str) -> Self {
        Self {
            file: file.into(),
            lines: text.lines().map(str::to_string).collect(),
            position: 0,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number of the most recently returned line
    pub fn line_number(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.lines.len()
    }

    /// Lines not yet read; an upper bound for any count declared in the file
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.position)
    }

    /// Next line with NUL bytes and trailing whitespace removed
    pub fn next_line(&mut self, field: &str) -> Result<String> {
        let raw = self
            .lines
            .get(self.position)
            .ok_or_else(|| XpsError::unexpected_eof(&self.file, field, self.position + 1))?;
        self.position += 1;

        let cleaned = raw.replace('\0', "");
        Ok(sanitize(cleaned.trim_end()).to_string())
    }

    /// Next line parsed as an integer
    pub fn next_int(&mut self, field: &str) -> Result<i64> {
        let line = self.next_line(field)?;
        line.trim().parse::<i64>().map_err(|_| {
            XpsError::field_conversion(&self.file, field, self.position, line.as_str(), "integer")
        })
    }

    /// Next line validated as a float, returned as read
    pub fn next_real(&mut self, field: &str) -> Result<String> {
        let line = self.next_line(field)?;
        match line.trim().parse::<f64>() {
            Ok(_) => Ok(line),
            Err(_) => Err(XpsError::field_conversion(
                &self.file,
                field,
                self.position,
                line.as_str(),
                "number",
            )),
        }
    }

    /// Next line as an optional sample; empty lines are missing values
    pub fn next_sample(&mut self, field: &str) -> Result<Option<f64>> {
        let line = self.next_line(field)?;
        let token = line.trim();
        if token.is_empty() {
            return Ok(None);
        }
        token.parse::<f64>().map(Some).map_err(|_| {
            XpsError::field_conversion(&self.file, field, self.position, token, "number")
        })
    }
}
