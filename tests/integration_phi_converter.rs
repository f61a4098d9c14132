//! Running a stand-in PHI exporter end to end
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use xps_processor::{BatchProcessor, DecoderConfig, Manufacturer};

/// Copies `<input stem>.export` into the output folder, as the exporter would
const STAND_IN: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -Filename:*) input="${arg#-Filename:}" ;;
    -OutputFolder:*) out="${arg#-OutputFolder:}" ;;
  esac
done
stem=$(basename "$input")
stem="${stem%.*}"
cp "${input%.*}.export" "$out/$stem.txt"
"#;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_batch_with_converter() {
    let temp_dir = tempfile::tempdir().unwrap();
    let raw_dir = temp_dir.path().join("raw");
    let out_dir = temp_dir.path().join("out");
    std::fs::create_dir_all(&raw_dir).unwrap();

    let script = temp_dir.path().join("export.sh");
    std::fs::write(&script, STAND_IN).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    std::fs::write(raw_dir.join("depth.pro"), [0u8; 8]).unwrap();
    std::fs::copy(fixture("depth.txt"), raw_dir.join("depth.export")).unwrap();

    let config = DecoderConfig::default()
        .with_manufacturer(Manufacturer::UlvacPhi)
        .with_converter(&script)
        .with_wine(false)
        .with_output_dir(&out_dir);
    let stats = BatchProcessor::new(vec![raw_dir.clone()], config)
        .without_progress()
        .process()
        .await
        .unwrap();

    assert_eq!(stats.files_failed, 0, "{:?}", stats.failures);
    assert_eq!(stats.files_processed, 1);
    for name in [
        "depth.txt",
        "depth.csv",
        "depth_profile.csv",
        "depth_C1s.csv",
        "depth_C1s_count.csv",
        "depth_O1s.csv",
        "depth.metadata.json",
    ] {
        assert!(out_dir.join(name).is_file(), "missing {}", name);
    }

    let profile = std::fs::read_to_string(out_dir.join("depth_profile.csv")).unwrap();
    assert_eq!(
        profile.lines().next(),
        Some("Sputter Time (min),C1s_Intensity (arb.units),O1s_Intensity (arb.units)")
    );
}
