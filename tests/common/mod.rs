//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a runseq.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("runseq.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Read the lines a test config appended to `log.txt`
pub fn read_log(dir: &TempDir) -> Vec<String> {
    fs::read_to_string(dir.path().join("log.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
