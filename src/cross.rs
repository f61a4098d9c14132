//! Outer-product expansion of per-region and per-cycle metadata.
//!
//! Spectral-axis arrays (length n) and depth-axis arrays (length m) are
//! reconciled into one table of n × m rows, aligned with emitted data
//! blocks. Row `r` pairs spectral entry `r mod n` with depth entry `r div n`.
//! Scalar values are then broadcast to every row.

use crate::error::{Result, XpsError};
use crate::models::{RepeatedMetadata, Value};
use tracing::debug;

type Column = (String, Vec<Value>);

#[derive(Debug, Clone, Default)]
pub struct CrossExpander {
    spectral: Vec<Column>,
    depth: Vec<Column>,
    scalars: Vec<(String, Value)>,
}

impl CrossExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spectral(&mut self, name: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.spectral.push((name.into(), values));
        self
    }

    pub fn depth(&mut self, name: impl Into<String>, values: Vec<Value>) -> &mut Self {
        self.depth.push((name.into(), values));
        self
    }

    pub fn scalar(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.scalars.push((name.into(), value));
        self
    }

    pub fn expand(&self) -> Result<RepeatedMetadata> {
        let n = axis_length("spectral", &self.spectral)?;
        let m = axis_length("depth", &self.depth)?;
        let rows = n * m;
        debug!("Cross expansion: {} spectral x {} depth = {} rows", n, m, rows);

        let mut repeated = RepeatedMetadata::new();

        for (name, values) in self.spectral.iter().filter(|(_, v)| !v.is_empty()) {
            let expanded = (0..rows).map(|r| values[r % n].clone()).collect();
            repeated.insert(name.as_str(), expanded)?;
        }
        for (name, values) in self.depth.iter().filter(|(_, v)| !v.is_empty()) {
            let expanded = (0..rows).map(|r| values[r / n].clone()).collect();
            repeated.insert(name.as_str(), expanded)?;
        }
        for (name, value) in &self.scalars {
            repeated.insert(name.as_str(), vec![value.clone(); rows])?;
        }

        Ok(repeated)
    }
}

/// Shared length of an axis; an absent or all-empty axis counts as one
fn axis_length(axis: &str, columns: &[Column]) -> Result<usize> {
    let mut present = columns.iter().filter(|(_, values)| !values.is_empty());
    let Some((_, first)) = present.next() else {
        return Ok(1);
    };
    let expected = first.len();

    for (name, values) in columns {
        if values.len() != expected {
            return Err(XpsError::axis_mismatch(axis, name.as_str(), expected, values.len()));
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::text(*v)).collect()
    }

    #[test]
    fn test_two_regions_by_three_cycles() {
        let mut expander = CrossExpander::new();
        expander
            .spectral("peak_name", texts(&["C", "O"]))
            .depth("cycle", texts(&["1", "2", "3"]))
            .scalar("XraySource", Value::text("Al"));

        let repeated = expander.expand().unwrap();

        assert_eq!(repeated.row_count(), Some(6));
        assert_eq!(
            repeated.get("peak_name").unwrap(),
            &texts(&["C", "O", "C", "O", "C", "O"])[..]
        );
        assert_eq!(
            repeated.get("cycle").unwrap(),
            &texts(&["1", "1", "2", "2", "3", "3"])[..]
        );
        assert_eq!(repeated.get("XraySource").unwrap(), &texts(&["Al"; 6])[..]);
    }

    #[test]
    fn test_missing_depth_axis_counts_as_one() {
        let mut expander = CrossExpander::new();
        expander.spectral("peak_name", texts(&["C", "O", "N"]));

        let repeated = expander.expand().unwrap();
        assert_eq!(repeated.row_count(), Some(3));
        assert_eq!(repeated.get("peak_name").unwrap(), &texts(&["C", "O", "N"])[..]);
    }

    #[test]
    fn test_scalars_alone_give_one_row() {
        let mut expander = CrossExpander::new();
        expander.scalar("AnalyserMode", Value::text("FAT"));
        assert_eq!(expander.expand().unwrap().row_count(), Some(1));
        assert!(CrossExpander::new().expand().unwrap().is_empty());
    }

    #[test]
    fn test_unequal_lengths_in_one_axis_fail() {
        let mut expander = CrossExpander::new();
        expander
            .spectral("peak_name", texts(&["C", "O"]))
            .spectral("pass_energy", texts(&["55"]));

        match expander.expand() {
            Err(XpsError::CrossExpansionAxisMismatch {
                axis,
                field,
                expected,
                found,
            }) => {
                assert_eq!(axis, "spectral");
                assert_eq!(field, "pass_energy");
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("Expected CrossExpansionAxisMismatch, got {:?}", other),
        }
    }
}
