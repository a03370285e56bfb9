//! Input files on temporary directories

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use uploader::FileJob;

/// Write `size` bytes of a repeating pattern to `dir/name`
pub fn write_file(dir: &TempDir, name: &str, size: usize) -> PathBuf {
    let path = dir.path().join(name);
    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    fs::write(&path, data).unwrap();
    path
}

pub fn job_for(path: &PathBuf) -> FileJob {
    FileJob::from_path(path).unwrap()
}
