//! Constant and repeated metadata for converted PHI exports.
//!
//! Per-region values come from `SpectralRegDef` and `SpectralRegDef2`,
//! per-layer values from `DepthCalDef`. The two are crossed so every
//! (region, layer) pair gets one row, and instrument settings are broadcast
//! to all rows.

use super::header::token_rows;
use crate::constants::{MEASURED_DATE_KEY, phi_keys, phi_metadata, phi_positions as pos};
use crate::cross::CrossExpander;
use crate::dates::{measured_date, split_compact_date};
use crate::error::{Result, XpsError};
use crate::models::{ConstantMetadata, Header, RepeatedMetadata, Value};
use regex::Regex;
use std::sync::LazyLock;

static NAME_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+|\D+").expect("region name pattern is valid"));

pub fn classify(
    header: &Header,
    file: &str,
    utc_offset_hours: i32,
) -> Result<(ConstantMetadata, RepeatedMetadata)> {
    let mut constant: ConstantMetadata = header
        .fields()
        .iter()
        .filter(|(name, _)| !phi_metadata::CONST_EXCEPTIONS.contains(name))
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    for key in phi_metadata::CONST_WITH_UNIT {
        if let Some(value) = header.text(key) {
            constant.insert(key.to_string(), Value::text(leading_token(value)));
        }
    }

    if let Some(date) = header.text(phi_keys::ACQ_FILE_DATE) {
        let (year, month, day) = split_compact_date(date).ok_or_else(|| {
            XpsError::field_conversion(file, phi_keys::ACQ_FILE_DATE, 0, date, "date (YYYYMMDD)")
        })?;
        constant.insert(
            MEASURED_DATE_KEY.to_string(),
            Value::Text(measured_date(file, year, month, day, utc_offset_hours)?),
        );
    }

    let mut expander = CrossExpander::new();
    spectral_axis(header, file, &mut expander)?;
    if let Some(total) = depth_axis(header, file, &mut expander)? {
        constant.insert("total_cycle_number".to_string(), Value::Int(total));
    }
    instrument_scalars(header, file, &mut expander)?;

    Ok((constant, expander.expand()?))
}

fn spectral_axis(header: &Header, file: &str, expander: &mut CrossExpander) -> Result<()> {
    if header.get(phi_keys::SPECTRAL_REG_DEF).is_some() {
        let regions = token_rows(header, phi_keys::SPECTRAL_REG_DEF);

        let (peaks, transitions): (Vec<Value>, Vec<Value>) = regions
            .iter()
            .filter_map(|tokens| tokens.get(pos::PEAK_NAME_TRANSITIONS))
            .map(|name| {
                let (peak, transition) = split_region_name(name);
                (Value::Text(peak), Value::Text(transition))
            })
            .unzip();

        expander
            .spectral("peak_name", peaks)
            .spectral("transitions", transitions)
            .spectral("abscissa_increment", column(&regions, pos::ABSCISSA_INCREMENT))
            .spectral("abscissa_start", column(&regions, pos::ABSCISSA_START))
            .spectral("abscissa_end", column(&regions, pos::ABSCISSA_END))
            .spectral("collection_time", column(&regions, pos::COLLECTION_TIME))
            .spectral("pass_energy", column(&regions, pos::PASS_ENERGY));
    }

    if header.get(phi_keys::SPECTRAL_REG_DEF2).is_some() {
        let regions = token_rows(header, phi_keys::SPECTRAL_REG_DEF2);
        let cycles = match header.text(phi_keys::SURV_NUM_CYCLES) {
            Some(text) => parse_int(text, phi_keys::SURV_NUM_CYCLES, file)?,
            None => 1,
        };

        let totals = regions
            .iter()
            .filter_map(|tokens| tokens.get(pos::TOTAL_ACQUISITION_NUMBER))
            .map(|sweeps| -> Result<Value> {
                Ok(Value::Int(cycles * parse_int(sweeps, phi_keys::SPECTRAL_REG_DEF2, file)?))
            })
            .collect::<Result<Vec<_>>>()?;

        expander
            .spectral("total_acquisition_number", totals)
            .spectral("peak_sweep_number", column(&regions, pos::PEAK_SWEEP_NUMBER));
    }

    Ok(())
}

/// Adds the per-layer columns, returning the total cycle count
fn depth_axis(header: &Header, file: &str, expander: &mut CrossExpander) -> Result<Option<i64>> {
    if header.get(phi_keys::DEPTH_CAL_DEF).is_none() {
        return Ok(None);
    }
    let layers = token_rows(header, phi_keys::DEPTH_CAL_DEF);

    let cycled: Vec<&Vec<String>> = layers
        .iter()
        .filter(|tokens| tokens.len() > pos::SPUTTERING_LAYER_PRESET_CYCLE_NUMBER)
        .collect();

    let mut total = 0;
    for tokens in &cycled {
        total += parse_int(
            &tokens[pos::SPUTTERING_LAYER_PRESET_CYCLE_NUMBER],
            phi_keys::DEPTH_CAL_DEF,
            file,
        )?;
    }

    let presets = cycled
        .iter()
        .map(|tokens| {
            Value::Text(format!(
                "{}min {}cyc",
                tokens[pos::SPUTTERING_LAYER_PRESET_INTERVAL_TIME],
                tokens[pos::SPUTTERING_LAYER_PRESET_CYCLE_NUMBER]
            ))
        })
        .collect();

    expander
        .depth("cycle_control_preset", presets)
        .depth(
            "software_preset_sputtering_layer_name",
            column(&layers, pos::SPUTTERING_LAYER_NAME),
        )
        .depth(
            "sputtering_layer_preset_interval_time",
            column(&layers, pos::SPUTTERING_LAYER_PRESET_INTERVAL_TIME),
        )
        .depth(
            "sputtering_layer_preset_cycle_number",
            column(&layers, pos::SPUTTERING_LAYER_PRESET_CYCLE_NUMBER),
        );

    Ok(Some(total))
}

fn instrument_scalars(header: &Header, file: &str, expander: &mut CrossExpander) -> Result<()> {
    for key in phi_metadata::VARIABLE_VERBATIM {
        if let Some(value) = header.get(key) {
            expander.scalar(*key, value.clone());
        }
    }
    for key in phi_metadata::VARIABLE_WITH_UNIT {
        if let Some(value) = header.text(key) {
            expander.scalar(*key, Value::text(leading_token(value)));
        }
    }

    if let Some(size) = header.text(phi_keys::IMAGE_SIZE_XY) {
        let parts: Vec<&str> = size.split_whitespace().collect();
        let &[width_x, width_y, region, ..] = parts.as_slice() else {
            return Err(XpsError::field_conversion(
                file,
                phi_keys::IMAGE_SIZE_XY,
                0,
                size,
                "size (X Y REGION)",
            ));
        };
        expander
            .scalar("analysis_width_x", Value::text(width_x))
            .scalar("analysis_width_y", Value::text(width_y))
            .scalar("analysis_region", Value::text(region));
    }

    Ok(())
}

/// Split a region name into peak and transition
///
/// "C1s" gives ("C", "1s"), "Fe_LMM" gives ("Fe", "LMM"). Survey and
/// valence regions have no transition.
pub fn split_region_name(name: &str) -> (String, String) {
    let parts: Vec<&str> = NAME_PARTS.find_iter(name).map(|m| m.as_str()).collect();
    let Some(first) = parts.first() else {
        return (String::new(), String::new());
    };

    match *first {
        "Su" => ("Survey".to_string(), String::new()),
        "Va" => ("Valence".to_string(), String::new()),
        first if first.contains('_') => {
            let (peak, transition) = first.split_once('_').unwrap_or((first, ""));
            (peak.to_string(), transition.to_string())
        }
        first => (first.to_string(), parts[1..].concat()),
    }
}

/// Token `index` of every row long enough to have one
fn column(rows: &[Vec<String>], index: usize) -> Vec<Value> {
    rows.iter()
        .filter_map(|tokens| tokens.get(index))
        .map(|token| Value::text(token.as_str()))
        .collect()
}

fn leading_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or_default()
}

fn parse_int(text: &str, field: &str, file: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| XpsError::field_conversion(file, field, 0, text, "integer"))
}
