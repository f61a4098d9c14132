//! Core data structures for decoded XPS files.
//!
//! Defines the field value union, ordered records, headers, blocks, the
//! metadata tables and the normalized decode result shared by both source
//! format families.

use crate::error::{Result, XpsError};
use crate::table::{NumericTable, SpeciesTables};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Build a list of text values
    pub fn text_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(values.into_iter().map(|v| Value::Text(v.into())).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Flatten a list into its comma-joined textual form; scalars pass through
    pub fn joined(&self) -> Value {
        match self {
            Value::List(items) => Value::Text(
                items
                    .iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                f.write_str(&rendered.join(","))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Ordered mapping of field names to values
///
/// Insertion order is the order in which fields were read from the file.
/// Re-inserting an existing name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check every field name against a closed schema
    pub fn validate_names(&self, record: &'static str, known: &[&str]) -> Result<()> {
        match self.names().find(|name| !known.contains(name)) {
            Some(unknown) => Err(XpsError::UnknownField {
                record,
                field: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Global file header
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Header {
    fields: Record,
}

impl Header {
    /// Header over an open key set (key-value exports)
    pub fn new(fields: Record) -> Self {
        Self { fields }
    }

    /// Header whose field names must belong to a closed schema
    pub fn with_schema(fields: Record, known: &[&str]) -> Result<Self> {
        fields.validate_names("header", known)?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.fields.int(name)
    }

    /// Extend with derived fields (axis labels of key-value exports)
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name, value);
    }
}

/// One measurement block
///
/// `ordinate_values` holds one row per channel and one column per sample.
/// For key-value exports the rows are the raw numeric columns of the
/// segment, abscissa first. Missing samples are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub fields: Record,
    #[serde(skip)]
    pub ordinate_values: Vec<Vec<Option<f64>>>,
}

impl Block {
    pub fn new(fields: Record, ordinate_values: Vec<Vec<Option<f64>>>) -> Self {
        Self {
            fields,
            ordinate_values,
        }
    }

    pub fn with_schema(
        fields: Record,
        ordinate_values: Vec<Vec<Option<f64>>>,
        known: &[&str],
    ) -> Result<Self> {
        fields.validate_names("block", known)?;
        Ok(Self::new(fields, ordinate_values))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.fields.int(name)
    }

    pub fn channel_count(&self) -> usize {
        self.ordinate_values.len()
    }

    pub fn samples_per_channel(&self) -> usize {
        self.ordinate_values.first().map_or(0, Vec::len)
    }
}

/// Values that hold for the whole file
pub type ConstantMetadata = BTreeMap<String, Value>;

/// Values with one entry per logical row
///
/// All columns share one length, checked on insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RepeatedMetadata {
    columns: BTreeMap<String, Vec<Value>>,
}

impl RepeatedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if let Some(rows) = self.row_count() {
            // Replacing the only column may change the row count
            let replaces_sole = self.columns.len() == 1 && self.columns.contains_key(&name);
            if values.len() != rows && !replaces_sole {
                return Err(XpsError::axis_mismatch("repeated", name, rows, values.len()));
            }
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Row count shared by all columns, `None` when empty
    pub fn row_count(&self) -> Option<usize> {
        self.columns.values().next().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Instrument manufacturers with a supported export family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Manufacturer {
    ScientaOmicron,
    UlvacPhi,
}

impl Manufacturer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Manufacturer::ScientaOmicron => "scienta_omicron",
            Manufacturer::UlvacPhi => "ulvac_phi",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "scienta_omicron" => Some(Manufacturer::ScientaOmicron),
            "ulvac_phi" => Some(Manufacturer::UlvacPhi),
            _ => None,
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source format, keyed by manufacturer and file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Scienta Omicron VAMAS text (`.vms`)
    Vamas,
    /// ULVAC-PHI spectra export (`.spe`)
    PhiSpectrum,
    /// ULVAC-PHI depth profile export (`.pro`)
    PhiProfile,
    /// ULVAC-PHI angle-resolved profile export (`.ang`)
    PhiAngle,
}

impl SourceFormat {
    /// Select the format for a manufacturer and input path
    pub fn select(manufacturer: Manufacturer, path: &Path) -> Result<Self> {
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        match (manufacturer, suffix.as_str()) {
            (Manufacturer::ScientaOmicron, ".vms") => Ok(SourceFormat::Vamas),
            (Manufacturer::UlvacPhi, ".spe") => Ok(SourceFormat::PhiSpectrum),
            (Manufacturer::UlvacPhi, ".pro") => Ok(SourceFormat::PhiProfile),
            (Manufacturer::UlvacPhi, ".ang") => Ok(SourceFormat::PhiAngle),
            _ => Err(XpsError::UnsupportedFormat {
                manufacturer: manufacturer.to_string(),
                suffix,
            }),
        }
    }

    /// Whether the raw file must go through the external converter first
    pub fn needs_conversion(&self) -> bool {
        !matches!(self, SourceFormat::Vamas)
    }

    /// Whether the converter must be asked for depth-profile output
    pub fn exports_profile(&self) -> bool {
        matches!(self, SourceFormat::PhiProfile | SourceFormat::PhiAngle)
    }
}

/// Normalized result of decoding one file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    pub source: PathBuf,
    pub format: SourceFormat,
    pub header: Header,
    pub blocks: Vec<Block>,
    /// Wide numeric table spanning every block or species
    pub table: NumericTable,
    /// Depth-profile table of profile exports
    pub profile: Option<NumericTable>,
    /// Per-species spectrum tables of key-value exports
    pub species: Vec<SpeciesTables>,
    pub constant: ConstantMetadata,
    pub repeated: RepeatedMetadata,
}

/// Batch processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_blocks: usize,
    pub output_dir: Option<PathBuf>,
    pub processing_time_ms: u128,
    pub failures: Vec<(PathBuf, String)>,
}
