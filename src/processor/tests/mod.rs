//! End-to-end tests of batch decoding over temporary directories


use std::path::{Path, PathBuf};

pub const NORM_VMS: &str = include_str!("../../../tests/fixtures/norm.vms");

/// Write the two-block VAMAS fixture under `dir` with the given file name
pub fn write_vamas(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, NORM_VMS).unwrap();
    path
}
