//! Error handling for XPS decoding operations.
//!
//! Every fatal condition aborts the decode of the whole file. Errors carry
//! the file identity and, where one exists, the logical field and line at
//! which decoding stopped.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XpsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected end of file in {file} while reading '{field}' (line {line})")]
    UnexpectedEndOfFile {
        file: String,
        field: String,
        line: usize,
    },

    #[error(
        "Field conversion failed in {file}: '{field}' at line {line} is not a valid {expected}: '{value}'"
    )]
    FieldConversion {
        file: String,
        field: String,
        line: usize,
        value: String,
        expected: &'static str,
    },

    #[error("Column count mismatch in {context}: expected {expected} columns, found {found}")]
    ColumnCountMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "Cross expansion failed on {axis} axis: field '{field}' has {found} values, expected {expected}"
    )]
    CrossExpansionAxisMismatch {
        axis: String,
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Unsupported value for '{field}' in {file}: '{value}'")]
    UnsupportedFormatValue {
        file: String,
        field: String,
        value: String,
    },

    #[error("Unsupported combination of manufacturer '{manufacturer}' and file extension '{suffix}'")]
    UnsupportedFormat {
        manufacturer: String,
        suffix: String,
    },

    #[error("Required field '{field}' missing in {file}")]
    MissingField { file: String, field: String },

    #[error("Field '{field}' is not part of the {record} schema")]
    UnknownField { record: &'static str, field: String },

    #[error("Profile mode was selected, but no profile data was found in {file}")]
    ProfileDataMissing { file: String },

    #[error("Converter '{program}' failed with status {status}: {stderr}")]
    ConverterFailed {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl XpsError {
    pub fn unexpected_eof(file: impl Into<String>, field: impl Into<String>, line: usize) -> Self {
        Self::UnexpectedEndOfFile {
            file: file.into(),
            field: field.into(),
            line,
        }
    }

    pub fn field_conversion(
        file: impl Into<String>,
        field: impl Into<String>,
        line: usize,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::FieldConversion {
            file: file.into(),
            field: field.into(),
            line,
            value: value.into(),
            expected,
        }
    }

    pub fn column_count(context: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ColumnCountMismatch {
            context: context.into(),
            expected,
            found,
        }
    }

    pub fn axis_mismatch(
        axis: impl Into<String>,
        field: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::CrossExpansionAxisMismatch {
            axis: axis.into(),
            field: field.into(),
            expected,
            found,
        }
    }

    pub fn unsupported_value(
        file: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::UnsupportedFormatValue {
            file: file.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn missing_field(file: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            file: file.into(),
            field: field.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, XpsError>;
