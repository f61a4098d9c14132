//! VAMAS header and block schemas.
//!
//! The header has 24 logical fields and each block 76, following the ISO
//! 14976 layout. Which of them are present depends on the experiment mode,
//! technique and scan mode read earlier in the file.

use super::rules::{Condition, ReadAs, Rule, apply_rules, field_names};
use crate::constants::{EXPERIMENT_MODES, REGULAR_SCAN, SCAN_MODES, TECHNIQUES, modes, techniques};
use crate::cursor::LineCursor;
use crate::error::{Result, XpsError};
use crate::models::{Block, Header};
use tracing::debug;

const fn mode_in(values: &'static [&'static str]) -> Condition {
    Condition::ValueIn {
        field: "experiment_mode",
        values,
    }
}

const fn technique_in(values: &'static [&'static str]) -> Condition {
    Condition::ValueIn {
        field: "technique",
        values,
    }
}

pub const HEADER_RULES: &[Rule] = &[
    Rule::text(&[
        "format_identifier",
        "institution_identifier",
        "instrument_model_identifier",
        "operator_identifier",
        "experiment_identifier",
    ]),
    Rule::read(&["number_of_lines_in_comment"], ReadAs::Int),
    Rule::read(&["comment"], ReadAs::JoinedLines {
        count: "number_of_lines_in_comment",
        omit_empty: false,
    }),
    Rule::read(&["experiment_mode"], ReadAs::Choice(EXPERIMENT_MODES)),
    Rule::read(&["scan_mode"], ReadAs::Choice(SCAN_MODES)),
    Rule::read(&["number_of_spectral_regions"], ReadAs::Int).when(mode_in(modes::SPECTRAL_REGIONS)),
    Rule::read(&["number_of_analysis_positions"], ReadAs::Int).when(mode_in(modes::MAPPING)),
    Rule::text(&[
        "number_of_discrete_x_coordinates_in_full_map",
        "number_of_discrete_y_coordinates_in_full_map",
    ])
    .when(mode_in(modes::MAPPING)),
    Rule::read(&["number_of_experimental_variables"], ReadAs::Int),
    Rule::read(&["experimental_variable_labels"], ReadAs::TextList {
        count: "number_of_experimental_variables",
        omit_empty: false,
    }),
    Rule::read(&["experimental_variable_units"], ReadAs::TextList {
        count: "number_of_experimental_variables",
        omit_empty: false,
    }),
    Rule::read(
        &["number_of_entries_in_parameter_inclusion_or_exclusion_list"],
        ReadAs::Int,
    ),
    Rule::read(&["parameter_inclusion_or_exclusion_prefix_numbers"], ReadAs::IntList {
        count: "number_of_entries_in_parameter_inclusion_or_exclusion_list",
    }),
    Rule::read(&["number_of_manually_entered_items_in_block"], ReadAs::Int),
    Rule::read(&["prefix_numbers_of_manually_entered_items"], ReadAs::IntList {
        count: "number_of_manually_entered_items_in_block",
    }),
    Rule::read(
        &[
            "number_of_future_upgrade_experiment_entries",
            "number_of_future_upgrade_block_entries",
        ],
        ReadAs::Int,
    ),
    Rule::read(&["future_upgrade_experiment_entries"], ReadAs::TextList {
        count: "number_of_future_upgrade_experiment_entries",
        omit_empty: false,
    }),
    Rule::read(&["number_of_blocks"], ReadAs::Int),
];

pub const BLOCK_RULES: &[Rule] = &[
    Rule::text(&[
        "block_identifier",
        "sample_identifier",
        "year_in_full",
        "month",
        "day_of_month",
        "hours",
        "minutes",
        "seconds",
    ]),
    Rule::read(
        &[
            "number_of_hours_in_advance_of_greenwich_mean_time",
            "number_of_lines_in_block_comment",
        ],
        ReadAs::Int,
    ),
    Rule::read(&["block_comment"], ReadAs::JoinedLines {
        count: "number_of_lines_in_block_comment",
        omit_empty: true,
    }),
    Rule::read(&["technique"], ReadAs::Choice(TECHNIQUES)),
    Rule::text(&["x_coordinate", "y_coordinate"]).when(mode_in(modes::MAPPING)),
    Rule::read(&["values_of_experimental_variables"], ReadAs::TextList {
        count: "number_of_experimental_variables",
        omit_empty: false,
    }),
    Rule::text(&["analysis_source_label"]),
    Rule::text(&[
        "sputtering_ion_or_atomic_number",
        "number_of_atoms_in_sputtering_ion_or_atom_particle",
        "sputtering_ion_of_atom_charge_sign_and_number",
    ])
    .when(Condition::Any(&[
        mode_in(modes::DEPTH_PROFILE),
        technique_in(techniques::ION_BEAM),
    ])),
    Rule::text(&[
        "analysis_source_characteristic_energy",
        "analysis_source_strength",
        "analysis_source_beam_width_x",
        "analysis_source_beam_width_y",
    ]),
    Rule::text(&["field_of_view_x", "field_of_view_y"]).when(mode_in(modes::FIELD_OF_VIEW)),
    Rule::text(&[
        "first_linescan_start_x_coordinate",
        "first_linescan_start_y_coordinate",
        "first_linescan_finish_x_coordinate",
        "first_linescan_finish_y_coordinate",
        "last_linescan_finish_x_coordinate",
        "last_linescan_finish_y_coordinate",
    ])
    .when(mode_in(modes::LINESCAN)),
    Rule::text(&[
        "analysis_source_polar_angle_of_incidence",
        "analysis_source_azimuth",
        "analyser_mode",
        "analyser_pass_energy_or_retard_ratio_or_mass_resolution",
    ]),
    Rule::text(&["differential_width"]).when(technique_in(techniques::DIFFERENTIAL)),
    Rule::text(&[
        "magnification_of_analyser_transfer_lens",
        "analyser_work_function_or_acceptance_energy_of_atom_or_ion",
        "target_bias",
        "analysis_width_x",
        "analysis_width_y",
        "analyser_axis_take_off_polar_angle",
        "analyser_axis_take_off_azimuth",
        "species_label",
        "transition_or_charge_state_label",
        "charge_of_detected_particle",
    ]),
    Rule::text(&["abscissa_label", "abscissa_units"]).when(Condition::ValueIn {
        field: "scan_mode",
        values: &[REGULAR_SCAN],
    }),
    Rule::read(&["abscissa_start", "abscissa_increment"], ReadAs::Real).when(
        Condition::ValueIn {
            field: "scan_mode",
            values: &[REGULAR_SCAN],
        },
    ),
    Rule::read(&["number_of_corresponding_variables"], ReadAs::Int),
    Rule::read(
        &["corresponding_variable_labels", "corresponding_variable_units"],
        ReadAs::Interleaved {
            count: "number_of_corresponding_variables",
            omit_empty: true,
        },
    ),
    Rule::text(&[
        "signal_mode",
        "signal_collection_time",
        "number_of_scans_to_compile_this_block",
        "signal_time_correction",
    ]),
    Rule::text(&[
        "sputtering_source_energy",
        "sputtering_source_beam_current",
        "sputtering_source_width_x",
        "sputtering_source_width_y",
        "sputtering_source_polar_angle_of_incidence",
        "sputtering_source_azimuth",
        "sputtering_mode",
    ])
    .when(Condition::All(&[
        technique_in(techniques::SPUTTER_SOURCE),
        mode_in(modes::DEPTH_PROFILE),
    ])),
    Rule::text(&[
        "sample_normal_polar_angle_of_tilt",
        "sample_normal_tilt_azimuth",
        "sample_rotation_angle",
    ]),
    Rule::read(&["number_of_additional_numerical_parameters"], ReadAs::Int),
    Rule::read(
        &[
            "additional_numerical_parameter_labels",
            "additional_numerical_parameter_units",
            "additional_numerical_parameter_values",
        ],
        ReadAs::Interleaved {
            count: "number_of_additional_numerical_parameters",
            omit_empty: true,
        },
    ),
    Rule::read(&["future_upgrade_block_entries"], ReadAs::TextList {
        count: "number_of_future_upgrade_block_entries",
        omit_empty: true,
    }),
    Rule::read(&["number_of_ordinate_values"], ReadAs::Int),
    Rule::read(
        &["minimum_ordinate_values", "maximum_ordinate_values"],
        ReadAs::Interleaved {
            count: "number_of_corresponding_variables",
            omit_empty: false,
        },
    ),
    Rule::read(&["ordinate_values"], ReadAs::Ordinate {
        samples: "number_of_ordinate_values",
        channels: "number_of_corresponding_variables",
    }),
];

pub fn header_fields() -> Vec<&'static str> {
    field_names(HEADER_RULES)
}

pub fn block_fields() -> Vec<&'static str> {
    field_names(BLOCK_RULES)
}

/// Decode the global header
pub fn decode_header(cursor: &mut LineCursor) -> Result<Header> {
    let output = apply_rules(HEADER_RULES, cursor, None)?;
    let header = Header::with_schema(output.record, &header_fields())?;
    debug!(
        "Decoded VAMAS header of {} with {} fields",
        cursor.file(),
        header.fields().len()
    );
    Ok(header)
}

/// Decode one block against the file header
pub fn decode_block(cursor: &mut LineCursor, header: &Header) -> Result<Block> {
    let output = apply_rules(BLOCK_RULES, cursor, Some(header))?;
    Block::with_schema(output.record, output.ordinate_values, &block_fields())
}

/// Decode every block declared by the header
pub fn decode_blocks(cursor: &mut LineCursor, header: &Header) -> Result<Vec<Block>> {
    let declared = header
        .int("number_of_blocks")
        .ok_or_else(|| XpsError::missing_field(cursor.file(), "number_of_blocks"))?;
    let count = usize::try_from(declared).unwrap_or(0);

    let mut blocks = Vec::with_capacity(count.min(cursor.remaining()));
    for index in 0..count {
        let block = decode_block(cursor, header)?;
        debug!(
            "Block {}/{} '{}': {} channels x {} samples",
            index + 1,
            count,
            block.text("block_identifier").unwrap_or_default(),
            block.channel_count(),
            block.samples_per_channel()
        );
        blocks.push(block);
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_slot_counts() {
        assert_eq!(header_fields().len(), 24);
        assert_eq!(block_fields().len(), 76);
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names = block_fields();
        names.extend(header_fields());
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
