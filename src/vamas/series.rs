//! Numeric series assembly for VAMAS blocks.
//!
//! Each block contributes one column group: the reconstructed abscissa
//! followed by one column per corresponding variable.

use crate::constants::REGULAR_SCAN;
use crate::error::{Result, XpsError};
use crate::models::{Block, Header, Value};
use crate::numeric::abscissa_series;
use crate::table::{ColumnGroup, NamedColumn, NumericTable};

/// Start and increment of a regular abscissa
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abscissa {
    pub start: f64,
    pub increment: f64,
}

impl Abscissa {
    pub fn of(block: &Block, file: &str) -> Result<Self> {
        Ok(Self {
            start: real_field(block, "abscissa_start", file)?,
            increment: real_field(block, "abscissa_increment", file)?,
        })
    }
}

fn real_field(block: &Block, field: &str, file: &str) -> Result<f64> {
    let text = block
        .text(field)
        .ok_or_else(|| XpsError::missing_field(file, field))?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| XpsError::field_conversion(file, field, 0, text, "number"))
}

/// Legend of each block: its species label, or `dataN` when blank
pub fn legends(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| match block.text("species_label").map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("data{}", index + 1),
        })
        .collect()
}

fn axis_name(label: Option<&str>, unit: Option<&str>) -> String {
    format!(
        "{}({})",
        label.unwrap_or_default().trim(),
        unit.unwrap_or_default().trim()
    )
}

fn list_item<'a>(block: &'a Block, field: &str, index: usize) -> Option<&'a str> {
    block
        .get(field)
        .and_then(Value::as_list)
        .and_then(|items| items.get(index))
        .and_then(Value::as_text)
}

/// Build the wide table spanning every block
pub fn assemble(header: &Header, blocks: &[Block], file: &str) -> Result<NumericTable> {
    let scan_mode = header.text("scan_mode").unwrap_or_default();
    if !scan_mode.trim().eq_ignore_ascii_case(REGULAR_SCAN) {
        return Err(XpsError::unsupported_value(file, "scan_mode", scan_mode));
    }

    let multiple = blocks.len() > 1;
    let legends = legends(blocks);
    let mut columns = Vec::new();
    let mut groups = Vec::with_capacity(blocks.len());

    for (index, block) in blocks.iter().enumerate() {
        let prefix = if multiple {
            format!("(data{})", index + 1)
        } else {
            String::new()
        };

        let abscissa = Abscissa::of(block, file)?;
        let samples = block.samples_per_channel();
        let x = abscissa_series(abscissa.start, abscissa.increment, samples);
        let x_name = axis_name(block.text("abscissa_label"), block.text("abscissa_units"));
        columns.push(NamedColumn::dense(format!("{}{}", prefix, x_name), &x));

        for (channel, values) in block.ordinate_values.iter().enumerate() {
            let y_name = axis_name(
                list_item(block, "corresponding_variable_labels", channel),
                list_item(block, "corresponding_variable_units", channel),
            );
            columns.push(NamedColumn::new(format!("{}{}", prefix, y_name), values.clone()));
        }

        groups.push(ColumnGroup::new(
            legends[index].clone(),
            1 + block.channel_count(),
        ));
    }

    let expected: usize = blocks.iter().map(|b| 1 + b.channel_count()).sum();
    let table = NumericTable::from_columns(columns, groups)?;
    table.ensure_columns(expected, file)?;
    Ok(table)
}
