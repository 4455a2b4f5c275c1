//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a yrun.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("yrun.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a temporary directory with a yrun.yml and a .env file beside it
pub fn create_test_config_with_env(content: &str, env: &str) -> (TempDir, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    fs::write(temp_dir.path().join(".env"), env).unwrap();
    (temp_dir, config_path)
}
