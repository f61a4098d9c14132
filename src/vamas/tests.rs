//! Whole-file VAMAS decoding tests

use super::VamasDecoder;
use crate::constants::MEASURED_DATE_KEY;
use crate::error::XpsError;
use crate::models::Value;

fn header_lines(mode: &str, blocks: usize) -> Vec<String> {
    let mut lines: Vec<String> = [
        "VAMAS Surface Chemical Analysis Standard Data Transfer Format 1988 May 4",
        "Test Institute",
        "PHOIBOS 150",
        "Operator",
        "Experiment 7",
        "2",
        "first comment line",
        "second comment line",
        mode,
        "REGULAR",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if ["MAP", "MAPDP", "NORM", "SDP"].contains(&mode) {
        lines.push("1".into());
    }
    if ["MAP", "MAPDP"].contains(&mode) {
        lines.extend(["4", "2", "2"].map(String::from));
    }
    // one experimental variable, labels then units
    lines.extend(["1", "Etch time", "s"].map(String::from));
    // inclusion list, manual items, future experiment and block entries
    lines.extend(["0", "0", "0", "0"].map(String::from));
    lines.push(blocks.to_string());
    lines
}

struct BlockSpec<'a> {
    identifier: &'a str,
    day: u32,
    technique: &'a str,
    start: &'a str,
    increment: &'a str,
    channels: usize,
    samples: Vec<&'a str>,
}

impl<'a> BlockSpec<'a> {
    fn xps(identifier: &'a str, day: u32, samples: Vec<&'a str>) -> Self {
        Self {
            identifier,
            day,
            technique: "XPS",
            start: "290",
            increment: "-0.1",
            channels: 1,
            samples,
        }
    }
}

fn block_lines(mode: &str, spec: &BlockSpec<'_>) -> Vec<String> {
    let mut lines: Vec<String> = vec![
        spec.identifier.to_string(),
        "Sample A".into(),
        "2023".into(),
        "5".into(),
        spec.day.to_string(),
        "10".into(),
        "30".into(),
        "0".into(),
        "9".into(),
        "1".into(),
        "block comment".into(),
        spec.technique.into(),
    ];

    let depth = ["MAPDP", "MAPSVDP", "SDP", "SDPSV"].contains(&mode);
    if ["MAP", "MAPDP"].contains(&mode) {
        lines.extend(["1", "2"].map(String::from));
    }
    lines.push("0".into()); // value of the one experimental variable
    lines.push("Al".into());
    if depth {
        lines.extend(["18", "1", "+1"].map(String::from));
    }
    lines.extend(["1486.6", "300", "1e37", "1e37"].map(String::from));
    if ["MAP", "MAPDP", "MAPSV", "MAPSVDP", "SEM"].contains(&mode) {
        lines.extend(["400", "400"].map(String::from));
    }
    if ["MAPSV", "MAPSVDP", "SEM"].contains(&mode) {
        lines.extend(["1", "2", "3", "4", "5", "6"].map(String::from));
    }
    lines.extend(["54.7", "0", "FAT", "20"].map(String::from));
    if spec.technique == "AES diff" {
        lines.push("2".into());
    }
    lines.extend(
        ["1", "4.5", "0", "1E+37", "1E+37", "0", "0", "C", "1s", "-1"].map(String::from),
    );
    lines.extend([
        "Binding Energy".to_string(),
        "eV".to_string(),
        spec.start.to_string(),
        spec.increment.to_string(),
    ]);
    lines.push(spec.channels.to_string());
    for channel in 0..spec.channels {
        lines.push(format!("Intensity{}", channel));
        lines.push("d".into());
    }
    lines.extend(["pulse counting", "0.1", "1", "0"].map(String::from));
    let sputter_source = ["AES diff", "AES dir", "EDX", "ELS", "UPS", "XPS", "XRF"];
    if depth && sputter_source.contains(&spec.technique) {
        lines.extend(["3000", "1", "1", "1", "45", "0", "continuous"].map(String::from));
    }
    lines.extend(["0", "0", "0"].map(String::from));
    lines.push("0".into()); // additional numerical parameters
    lines.push(spec.samples.len().to_string());
    for _ in 0..spec.channels {
        lines.extend(["0", "100"].map(String::from));
    }
    lines.extend(spec.samples.iter().map(|s| s.to_string()));
    lines
}

fn vamas_text(mode: &str, blocks: &[BlockSpec<'_>]) -> String {
    let mut lines = header_lines(mode, blocks.len());
    for spec in blocks {
        lines.extend(block_lines(mode, spec));
    }
    lines.push("end of experiment".into());
    lines.join("\r\n")
}

#[test]
fn test_decode_norm_file() {
    let text = vamas_text(
        "NORM",
        &[
            BlockSpec::xps("C 1s", 12, vec!["10", "20", "30"]),
            BlockSpec::xps("O 1s", 14, vec!["1", "2", "3", "4"]),
        ],
    );

    let decoded = VamasDecoder::new(9).decode_text("norm.vms", &text).unwrap();

    assert_eq!(decoded.blocks.len(), 2);
    assert_eq!(decoded.header.int("number_of_blocks"), Some(2));
    assert_eq!(
        decoded.header.text("comment"),
        Some("first comment line\nsecond comment line")
    );
    assert!(decoded.header.get("number_of_analysis_positions").is_none());

    let first = &decoded.blocks[0];
    assert!(first.get("x_coordinate").is_none());
    assert!(first.get("sputtering_source_energy").is_none());
    assert_eq!(first.text("analysis_source_beam_width_x"), Some(""));
    assert_eq!(first.text("target_bias"), Some("0"));
    assert_eq!(first.text("analysis_width_x"), Some(""));

    assert_eq!(decoded.table.width(), 4);
    assert_eq!(decoded.table.height(), 4);
    assert_eq!(
        decoded.table.column_values(0).unwrap(),
        vec![Some(290.0), Some(289.9), Some(289.8), None]
    );

    assert_eq!(
        decoded.constant.get(MEASURED_DATE_KEY),
        Some(&Value::text("2023-05-14T00:00:00+09:00"))
    );
    assert_eq!(
        decoded.constant.get("abscissa_end"),
        Some(&Value::List(vec![Value::Float(289.8), Value::Float(289.7)]))
    );
    assert_eq!(decoded.repeated.row_count(), Some(2));
    assert_eq!(
        decoded.repeated.get("block_identifier"),
        Some(&[Value::text("C 1s"), Value::text("O 1s")][..])
    );
}

#[test]
fn test_decode_depth_profile_mode_reads_conditional_fields() {
    let text = vamas_text("MAPDP", &[BlockSpec::xps("C 1s", 3, vec!["5", "6"])]);
    let decoded = VamasDecoder::new(9).decode_text("mapdp.vms", &text).unwrap();

    assert_eq!(decoded.header.int("number_of_analysis_positions"), Some(4));
    let block = &decoded.blocks[0];
    assert_eq!(block.text("x_coordinate"), Some("1"));
    assert_eq!(block.text("sputtering_ion_or_atomic_number"), Some("18"));
    assert_eq!(block.text("field_of_view_x"), Some("400"));
    assert_eq!(block.text("sputtering_mode"), Some("continuous"));
    assert!(block.get("first_linescan_start_x_coordinate").is_none());
    assert_eq!(decoded.table.column_names(), vec!["Binding Energy(eV)", "Intensity0(d)"]);
}

#[test]
fn test_ion_technique_reads_sputtering_ion_fields() {
    let mut spec = BlockSpec::xps("Si", 1, vec!["1"]);
    spec.technique = "SIMS";
    let mut lines = header_lines("NORM", 1);
    let mut block = block_lines("NORM", &spec);
    // the ion fields follow the analysis source label
    let label_at = block.iter().position(|l| l == "Al").unwrap();
    block.splice(label_at + 1..label_at + 1, ["28", "1", "-1"].map(String::from));
    lines.extend(block);

    let decoded = VamasDecoder::new(9)
        .decode_text("sims.vms", &lines.join("\n"))
        .unwrap();
    assert_eq!(
        decoded.blocks[0].text("sputtering_ion_of_atom_charge_sign_and_number"),
        Some("-1")
    );
}

#[test]
fn test_block_count_matches_header() {
    let specs: Vec<BlockSpec<'_>> = (1..=5)
        .map(|day| BlockSpec::xps("Survey", day, vec!["1", "2"]))
        .collect();
    let decoded = VamasDecoder::new(9)
        .decode_text("many.vms", &vamas_text("NORM", &specs))
        .unwrap();
    assert_eq!(decoded.blocks.len(), 5);
    assert_eq!(decoded.table.groups().len(), 5);
    assert_eq!(decoded.table.column_names()[8], "(data5)Binding Energy(eV)");
}

#[test]
fn test_multi_channel_ordinate_split() {
    let mut spec = BlockSpec::xps("C 1s", 1, vec!["0", "10", "1", "11", "2", "12", "3", "13", "4", "14"]);
    spec.channels = 2;
    let decoded = VamasDecoder::new(9)
        .decode_text("two.vms", &vamas_text("NORM", &[spec]))
        .unwrap();

    let block = &decoded.blocks[0];
    assert_eq!(block.channel_count(), 2);
    assert_eq!(block.samples_per_channel(), 5);
    assert_eq!(
        block.ordinate_values[1],
        vec![Some(10.0), Some(11.0), Some(12.0), Some(13.0), Some(14.0)]
    );
    assert_eq!(decoded.table.width(), 3);
}

#[test]
fn test_sentinel_samples_become_missing() {
    let spec = BlockSpec::xps("C 1s", 1, vec!["1", "1e+37", "3"]);
    let decoded = VamasDecoder::new(9)
        .decode_text("gap.vms", &vamas_text("NORM", &[spec]))
        .unwrap();
    assert_eq!(
        decoded.blocks[0].ordinate_values[0],
        vec![Some(1.0), None, Some(3.0)]
    );
}

#[test]
fn test_truncated_file_is_fatal() {
    let text = vamas_text("NORM", &[BlockSpec::xps("C 1s", 1, vec!["1", "2", "3"])]);
    let lines: Vec<&str> = text.lines().collect();
    let truncated = lines[..lines.len() - 3].join("\n");

    match VamasDecoder::new(9).decode_text("cut.vms", &truncated) {
        Err(XpsError::UnexpectedEndOfFile { file, field, .. }) => {
            assert_eq!(file, "cut.vms");
            assert_eq!(field, "ordinate_values");
        }
        other => panic!("Expected UnexpectedEndOfFile, got {:?}", other.map(|d| d.blocks.len())),
    }
}

#[test]
fn test_unknown_technique_is_fatal() {
    let mut spec = BlockSpec::xps("C 1s", 1, vec!["1"]);
    spec.technique = "RAMAN";
    match VamasDecoder::new(9).decode_text("raman.vms", &vamas_text("NORM", &[spec])) {
        Err(XpsError::UnsupportedFormatValue { field, value, .. }) => {
            assert_eq!(field, "technique");
            assert_eq!(value, "RAMAN");
        }
        other => panic!("Expected UnsupportedFormatValue, got {:?}", other.map(|d| d.blocks.len())),
    }
}

#[test]
fn test_non_numeric_count_is_fatal() {
    let text = vamas_text("NORM", &[]).replace("\r\n2\r\nfirst", "\r\ntwo\r\nfirst");
    assert!(matches!(
        VamasDecoder::new(9).decode_text("bad.vms", &text),
        Err(XpsError::FieldConversion { .. })
    ));
}

#[test]
fn test_differential_technique_reads_width() {
    let mut spec = BlockSpec::xps("C KLL", 1, vec!["1", "2"]);
    spec.technique = "AES diff";
    let decoded = VamasDecoder::new(9)
        .decode_text("aes.vms", &vamas_text("NORM", &[spec]))
        .unwrap();

    let block = &decoded.blocks[0];
    assert_eq!(block.text("differential_width"), Some("2"));
    assert_eq!(block.text("magnification_of_analyser_transfer_lens"), Some("1"));
}

#[test]
fn test_linescan_modes_read_linescan_fields() {
    for mode in ["MAPSV", "SEM"] {
        let decoded = VamasDecoder::new(9)
            .decode_text("line.vms", &vamas_text(mode, &[BlockSpec::xps("Si", 1, vec!["7"])]))
            .unwrap();

        let block = &decoded.blocks[0];
        assert!(decoded.header.get("number_of_spectral_regions").is_none());
        assert!(block.get("x_coordinate").is_none());
        assert_eq!(block.text("field_of_view_y"), Some("400"));
        assert_eq!(block.text("first_linescan_start_x_coordinate"), Some("1"));
        assert_eq!(block.text("first_linescan_finish_y_coordinate"), Some("4"));
        assert_eq!(block.text("last_linescan_finish_y_coordinate"), Some("6"));
        assert_eq!(block.text("analyser_mode"), Some("FAT"));
        assert_eq!(block.ordinate_values[0], vec![Some(7.0)]);
    }
}

#[test]
fn test_ion_technique_in_depth_profile_skips_sputtering_source() {
    let mut spec = BlockSpec::xps("Si", 1, vec!["1", "2"]);
    spec.technique = "SIMS";
    let decoded = VamasDecoder::new(9)
        .decode_text("sdp.vms", &vamas_text("SDP", &[spec]))
        .unwrap();

    let block = &decoded.blocks[0];
    assert_eq!(block.text("sputtering_ion_or_atomic_number"), Some("18"));
    assert_eq!(
        block.text("sputtering_ion_of_atom_charge_sign_and_number"),
        Some("+1")
    );
    assert!(block.get("sputtering_source_energy").is_none());
    assert!(block.get("sputtering_mode").is_none());
    assert_eq!(block.text("sample_normal_polar_angle_of_tilt"), Some("0"));
    assert_eq!(block.ordinate_values[0], vec![Some(1.0), Some(2.0)]);
}

#[test]
fn test_future_upgrade_experiment_entries_are_read() {
    let mut lines = header_lines("NORM", 1);
    let count_at = lines.len() - 3;
    lines[count_at] = "2".into();
    let blocks_at = lines.len() - 1;
    lines.splice(blocks_at..blocks_at, ["alpha", "beta"].map(String::from));
    lines.extend(block_lines("NORM", &BlockSpec::xps("C 1s", 1, vec!["1"])));

    let decoded = VamasDecoder::new(9)
        .decode_text("future.vms", &lines.join("\r\n"))
        .unwrap();

    assert_eq!(
        decoded.header.get("future_upgrade_experiment_entries"),
        Some(&Value::text_list(["alpha", "beta"]))
    );
    assert_eq!(decoded.header.int("number_of_blocks"), Some(1));
    assert_eq!(decoded.blocks[0].text("block_identifier"), Some("C 1s"));
}

#[test]
fn test_huge_block_count_on_short_file_is_eof() {
    let mut lines = header_lines("NORM", 0);
    let last = lines.len() - 1;
    lines[last] = "4611686018427387904".into();

    assert!(matches!(
        VamasDecoder::new(9).decode_text("blocks.vms", &lines.join("\n")),
        Err(XpsError::UnexpectedEndOfFile { .. })
    ));
}

#[test]
fn test_huge_ordinate_count_on_truncated_file_is_eof() {
    let spec = BlockSpec::xps("C 1s", 1, vec!["1", "2", "3"]);
    let mut lines = header_lines("NORM", 1);
    let mut block = block_lines("NORM", &spec);
    // count line sits before the min/max pairs and the samples
    let count_at = block.len() - spec.samples.len() - 2 * spec.channels - 1;
    block[count_at] = "2305843009213693952".into();
    lines.extend(block);

    match VamasDecoder::new(9).decode_text("huge.vms", &lines.join("\n")) {
        Err(XpsError::UnexpectedEndOfFile { field, .. }) => {
            assert_eq!(field, "ordinate_values");
        }
        other => panic!("Expected UnexpectedEndOfFile, got {:?}", other.map(|d| d.blocks.len())),
    }
}
