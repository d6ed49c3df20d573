//! Shared utilities for integration tests

use std::fs;
use std::path::PathBuf;

use trxdec::Burst;

/// Write a burst to a temp file in the raw interleaved-float format the
/// decoder binary reads, returning the path.
pub fn write_burst_file(name: &str, burst: &Burst) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("trxdec-test-{}-{}.iq", std::process::id(), name));
    fs::write(&path, burst.to_le_bytes()).expect("write burst file");
    path
}

/// Read a burst back from a raw interleaved-float file.
pub fn read_burst_file(path: &PathBuf, sps: u32) -> Burst {
    let bytes = fs::read(path).expect("read burst file");
    Burst::from_le_bytes(&bytes, sps).expect("decode burst file")
}
