//! Decoding real fixture files through the public API

use std::path::{Path, PathBuf};
use xps_processor::constants::MEASURED_DATE_KEY;
use xps_processor::{
    Decoder, DecoderConfig, FormatDecoder, Manufacturer, SourceFormat, Value, XpsError,
    decode_file,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_decode_vamas_fixture() {
    let decoded = decode_file(&fixture("norm.vms"), &DecoderConfig::default()).unwrap();

    assert_eq!(decoded.format, SourceFormat::Vamas);
    assert_eq!(decoded.blocks.len(), 2);
    assert_eq!(decoded.header.text("institution_identifier"), Some("Test Institute"));
    assert_eq!(decoded.blocks[1].text("block_identifier"), Some("O 1s"));

    assert_eq!(decoded.table.groups().len(), 2);
    assert_eq!(decoded.table.height(), 4);
    assert_eq!(
        decoded.table.column_values(2).unwrap(),
        vec![Some(540.0), Some(539.9), Some(539.8), Some(539.7)]
    );
    assert_eq!(
        decoded.table.column_values(1).unwrap(),
        vec![Some(10.0), Some(20.0), Some(30.0), None]
    );

    assert_eq!(
        decoded.constant.get(MEASURED_DATE_KEY),
        Some(&Value::text("2023-05-14T00:00:00+09:00"))
    );
    assert_eq!(decoded.repeated.row_count(), Some(2));
}

#[test]
fn test_utc_offset_from_config() {
    let config = DecoderConfig::default().with_utc_offset_hours(-3);
    let decoded = decode_file(&fixture("norm.vms"), &config).unwrap();

    assert_eq!(
        decoded.constant.get(MEASURED_DATE_KEY),
        Some(&Value::text("2023-05-14T00:00:00-03:00"))
    );
}

#[test]
fn test_phi_text_next_to_raw_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let raw = temp_dir.path().join("depth.pro");
    std::fs::write(&raw, [0u8; 8]).unwrap();
    std::fs::copy(fixture("depth.txt"), temp_dir.path().join("depth.txt")).unwrap();

    let config = DecoderConfig::default().with_manufacturer(Manufacturer::UlvacPhi);
    let decoder = FormatDecoder::select(config.manufacturer, &raw, &config).unwrap();
    assert_eq!(decoder.format(), SourceFormat::PhiProfile);

    let decoded = decoder.decode(&raw).unwrap();
    let profile = decoded.profile.as_ref().unwrap();
    assert_eq!(profile.height(), 2);
    assert_eq!(profile.width(), 3);
    assert_eq!(decoded.species.len(), 2);
    assert_eq!(decoded.repeated.row_count(), Some(2));
}

#[test]
fn test_unsupported_pair_is_reported() {
    let config = DecoderConfig::default().with_manufacturer(Manufacturer::UlvacPhi);
    match decode_file(&fixture("norm.vms"), &config) {
        Err(XpsError::UnsupportedFormat {
            manufacturer,
            suffix,
        }) => {
            assert_eq!(manufacturer, "ulvac_phi");
            assert_eq!(suffix, ".vms");
        }
        other => panic!("Expected UnsupportedFormat, got {:?}", other.map(|d| d.source)),
    }
}
