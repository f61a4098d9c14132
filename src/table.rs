//! Wide numeric tables backed by polars.
//!
//! A [`NumericTable`] is a rectangular frame of nullable `Float64` columns.
//! Columns come in groups (one per block or per species), and the sum of the
//! group widths must equal the frame width.

use crate::error::{Result, XpsError};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// One contiguous group of columns sharing a legend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    pub legend: String,
    pub width: usize,
}

impl ColumnGroup {
    pub fn new(legend: impl Into<String>, width: usize) -> Self {
        Self {
            legend: legend.into(),
            width,
        }
    }
}

/// A named column awaiting assembly into a table
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NamedColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn dense(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Some).collect())
    }
}

#[derive(Debug, Clone)]
pub struct NumericTable {
    frame: DataFrame,
    groups: Vec<ColumnGroup>,
}

impl NumericTable {
    pub fn empty() -> Self {
        Self {
            frame: DataFrame::empty(),
            groups: Vec::new(),
        }
    }

    /// Assemble columns into a table, padding shorter columns with nulls
    ///
    /// Duplicate names get a `_N` suffix so every column stays addressable.
    pub fn from_columns(columns: Vec<NamedColumn>, groups: Vec<ColumnGroup>) -> Result<Self> {
        let expected: usize = groups.iter().map(|g| g.width).sum();
        if expected != columns.len() {
            return Err(XpsError::column_count(
                "numeric table groups",
                expected,
                columns.len(),
            ));
        }

        let height = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        let mut seen = HashSet::new();
        let mut polars_columns = Vec::with_capacity(columns.len());

        for column in columns {
            let name = unique_name(&column.name, &mut seen);
            let mut values = column.values;
            values.resize(height, None);
            polars_columns.push(Column::new(name.into(), values));
        }

        let frame = DataFrame::new(polars_columns)?;
        debug!(
            "Assembled numeric table: {} columns x {} rows in {} groups",
            frame.width(),
            frame.height(),
            groups.len()
        );

        Ok(Self { frame, groups })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }

    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.width() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Values of the column at `index`, nulls included
    pub fn column_values(&self, index: usize) -> Result<Vec<Option<f64>>> {
        let column = self
            .frame
            .get_columns()
            .get(index)
            .ok_or_else(|| XpsError::column_count("column lookup", index + 1, self.width()))?;
        Ok(column.f64()?.into_iter().collect())
    }

    /// Fail unless the table has exactly `expected` columns
    pub fn ensure_columns(&self, expected: usize, context: &str) -> Result<()> {
        if self.width() != expected {
            return Err(XpsError::column_count(context, expected, self.width()));
        }
        Ok(())
    }

    /// Check that every legend owns `dimensions` columns
    pub fn check_legends(&self, legends: &[String], dimensions: usize) -> Result<()> {
        self.ensure_columns(legends.len() * dimensions, "legend columns")
    }

    /// Concatenate tables left to right, keeping their groups
    pub fn hconcat(tables: Vec<NumericTable>) -> Result<Self> {
        let mut columns = Vec::new();
        let mut groups = Vec::new();
        for table in tables {
            for index in 0..table.width() {
                let name = table.frame.get_columns()[index].name().to_string();
                columns.push(NamedColumn::new(name, table.column_values(index)?));
            }
            groups.extend(table.groups);
        }
        Self::from_columns(columns, groups)
    }
}

fn unique_name(name: &str, seen: &mut HashSet<String>) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}_{}", name, suffix);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Spectrum tables of one atomic species
#[derive(Debug, Clone)]
pub struct SpeciesTables {
    pub name: String,
    /// Intensity as exported
    pub cps: NumericTable,
    /// Intensity multiplied by the region's collection time
    pub counts: Option<NumericTable>,
}
