//! Constant and repeated metadata for VAMAS files.

use super::series::Abscissa;
use crate::constants::MEASURED_DATE_KEY;
use crate::dates::measured_date;
use crate::error::{Result, XpsError};
use crate::models::{Block, ConstantMetadata, Header, RepeatedMetadata, Value};
use crate::numeric::{decimal_places, round_to};

/// Partition decoded fields into file-wide and per-block metadata
pub fn classify(
    header: &Header,
    blocks: &[Block],
    file: &str,
    utc_offset_hours: i32,
) -> Result<(ConstantMetadata, RepeatedMetadata)> {
    let mut constant: ConstantMetadata = header
        .fields()
        .iter()
        .filter(|(_, value)| !value.is_list())
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    // The last block carries the date of the file
    if let Some(last) = blocks.last() {
        let year = date_part(last, "year_in_full", file)?;
        let month = date_part(last, "month", file)?;
        let day = date_part(last, "day_of_month", file)?;
        let date = measured_date(file, year as i32, month as u32, day as u32, utc_offset_hours)?;
        constant.insert(MEASURED_DATE_KEY.to_string(), Value::Text(date));
    }

    let mut abscissa_ends = Vec::with_capacity(blocks.len());
    let mut abscissa_labels = Vec::with_capacity(blocks.len());
    let mut variable_labels = Vec::with_capacity(blocks.len());

    for block in blocks {
        let abscissa = Abscissa::of(block, file)?;
        let last_index = block.samples_per_channel() as f64 - 1.0;
        let end = round_to(
            abscissa.start + abscissa.increment * last_index,
            decimal_places(abscissa.increment),
        );
        abscissa_ends.push(Value::Float(end));

        abscissa_labels.push(Value::Text(format!(
            "{} ({})",
            block.text("abscissa_label").unwrap_or_default(),
            block.text("abscissa_units").unwrap_or_default()
        )));

        variable_labels.push(Value::Text(format!(
            "{} ({})",
            joined_text(block, "corresponding_variable_labels"),
            joined_text(block, "corresponding_variable_units")
        )));
    }

    constant.insert("abscissa_end".to_string(), Value::List(abscissa_ends));
    constant.insert("abscissa_label".to_string(), Value::List(abscissa_labels));
    constant.insert(
        "corresponding_variables_label".to_string(),
        Value::List(variable_labels),
    );

    let mut names: Vec<&str> = Vec::new();
    for block in blocks {
        for name in block.fields.names() {
            if !names.contains(&name) && !constant.contains_key(name) {
                names.push(name);
            }
        }
    }

    let mut repeated = RepeatedMetadata::new();
    for name in names {
        let values = blocks
            .iter()
            .map(|block| block.get(name).map_or(Value::Null, Value::joined))
            .collect();
        repeated.insert(name, values)?;
    }

    Ok((constant, repeated))
}

fn date_part(block: &Block, field: &str, file: &str) -> Result<i64> {
    let text = block
        .text(field)
        .ok_or_else(|| XpsError::missing_field(file, field))?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| XpsError::field_conversion(file, field, 0, text, "integer"))
}

fn joined_text(block: &Block, field: &str) -> String {
    block
        .get(field)
        .map(|value| value.joined().to_string())
        .unwrap_or_default()
}
