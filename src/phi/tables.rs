//! Numeric tables of converted PHI exports.

use super::header::token_rows;
use super::segment::Segment;
use crate::constants::{phi_keys, phi_positions};
use crate::error::{Result, XpsError};
use crate::models::Header;
use crate::numeric::{format_general, round_to};
use crate::table::{ColumnGroup, NamedColumn, NumericTable, SpeciesTables};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Decimals kept when converting intensity to counts
const COUNTS_DECIMALS: usize = 4;

/// Depth profile table and the z values it spans
#[derive(Debug, Clone)]
pub struct ProfileTable {
    pub table: NumericTable,
    pub z_values: Vec<f64>,
}

/// Join every profile segment on its z column
///
/// The z axis keeps first-appearance order when all segments share one z
/// sequence, and is sorted ascending otherwise.
pub fn profile_table(segments: &[Segment], header: &Header, file: &str) -> Result<ProfileTable> {
    let profiles: Vec<&Segment> = segments.iter().filter(|s| s.is_profile).collect();
    if profiles.is_empty() {
        return Err(XpsError::ProfileDataMissing {
            file: file.to_string(),
        });
    }

    let sequences: Vec<Vec<(f64, Option<f64>)>> = profiles
        .iter()
        .map(|segment| {
            segment
                .rows
                .iter()
                .filter_map(|row| {
                    let z = row.first().copied().flatten()?;
                    Some((z, row.get(1).copied().flatten()))
                })
                .collect()
        })
        .collect();

    let mut z_values: Vec<f64> = Vec::new();
    let mut seen = HashSet::new();
    for (z, _) in sequences.iter().flatten() {
        if seen.insert(z.to_bits()) {
            z_values.push(*z);
        }
    }

    let same_axis = sequences.windows(2).all(|pair| {
        pair[0].iter().map(|(z, _)| z).eq(pair[1].iter().map(|(z, _)| z))
    });
    if !same_axis {
        z_values.sort_by(f64::total_cmp);
    }

    let z_label = match (header.text("zlabelname"), header.text("zlabelunit")) {
        (Some(name), Some(unit)) => format!("{} ({})", name, unit),
        _ => String::new(),
    };

    let mut columns = vec![NamedColumn::dense(z_label.as_str(), &z_values)];
    let mut groups = vec![ColumnGroup::new(z_label.as_str(), 1)];

    for (segment, sequence) in profiles.iter().zip(&sequences) {
        let mut by_z = HashMap::new();
        for (z, intensity) in sequence {
            by_z.entry(z.to_bits()).or_insert(*intensity);
        }
        let values = z_values
            .iter()
            .map(|z| by_z.get(&z.to_bits()).copied().flatten())
            .collect();
        columns.push(NamedColumn::new(
            format!("{}_Intensity (arb.units)", segment.species()),
            values,
        ));
        groups.push(ColumnGroup::new(segment.species(), 1));
    }

    let table = NumericTable::from_columns(columns, groups)?;
    debug!(
        "Profile table for {}: {} species over {} z values",
        file,
        profiles.len(),
        z_values.len()
    );

    Ok(ProfileTable { table, z_values })
}

/// Spectrum tables of one species
///
/// With a z axis every column after x is the spectrum at one z value.
/// Without one the segment holds a single `[x, y]` spectrum.
pub fn species_tables(
    segment: &Segment,
    header: &Header,
    z_values: Option<&[f64]>,
    file: &str,
) -> Result<SpeciesTables> {
    let species = segment.species();
    let x_label = header.text("xlabel").unwrap_or("x");
    let y_label = header.text("ylabel").unwrap_or("y");
    let z_unit = header.text("zlabelunit").unwrap_or_default();

    let names = column_names(x_label, y_label, z_unit, z_values);
    if !segment.rows.is_empty() && segment.width() != names.len() {
        return Err(XpsError::column_count(
            format!("{} spectrum of {}", species, file),
            names.len(),
            segment.width(),
        ));
    }

    let columns: Vec<Vec<Option<f64>>> = (0..names.len()).map(|i| segment.column(i)).collect();
    let cps = build_table(species, &names, columns.clone())?;

    let counts = if y_label.contains("(cps)") {
        let collection_time = collection_time(header, species, file)?;
        let counts_label = y_label.replace("(cps)", "(counts)");
        let names = column_names(x_label, &counts_label, z_unit, z_values);
        let scaled = columns
            .into_iter()
            .enumerate()
            .map(|(index, column)| {
                if index == 0 {
                    return column;
                }
                column
                    .into_iter()
                    .map(|v| v.map(|y| round_to(y * collection_time, COUNTS_DECIMALS)))
                    .collect()
            })
            .collect();
        Some(build_table(species, &names, scaled)?)
    } else {
        None
    };

    Ok(SpeciesTables {
        name: species.to_string(),
        cps,
        counts,
    })
}

fn column_names(x_label: &str, y_label: &str, z_unit: &str, z_values: Option<&[f64]>) -> Vec<String> {
    let mut names = vec![x_label.to_string()];
    match z_values {
        Some(z_values) => names.extend(
            z_values
                .iter()
                .map(|z| format!("{}{}_{}", format_general(*z, 6), z_unit, y_label)),
        ),
        None => names.push(y_label.to_string()),
    }
    names
}

fn build_table(species: &str, names: &[String], columns: Vec<Vec<Option<f64>>>) -> Result<NumericTable> {
    let columns = names
        .iter()
        .zip(columns)
        .map(|(name, values)| NamedColumn::new(name.as_str(), values))
        .collect();
    NumericTable::from_columns(columns, vec![ColumnGroup::new(species, names.len())])
}

/// Collection time of the first spectral region named `species`
fn collection_time(header: &Header, species: &str, file: &str) -> Result<f64> {
    let field = "collection_time";
    let token = token_rows(header, phi_keys::SPECTRAL_REG_DEF)
        .into_iter()
        .find(|tokens| {
            tokens.get(phi_positions::PEAK_NAME_TRANSITIONS).map(String::as_str) == Some(species)
        })
        .and_then(|tokens| tokens.get(phi_positions::COLLECTION_TIME).cloned())
        .ok_or_else(|| XpsError::missing_field(file, format!("{} of {}", field, species)))?;

    token
        .parse::<f64>()
        .map_err(|_| XpsError::field_conversion(file, field, 0, token.as_str(), "number"))
}
