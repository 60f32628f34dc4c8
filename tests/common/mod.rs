/*!
 * Common test utilities for the vidscribe test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample transcript JSON document for testing
pub fn create_test_transcript(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"{
  "chunks": [
    {"timestamp": [0, 1.5], "text": "This is a test transcript."},
    {"timestamp": [1.5, 4.0], "text": "It contains multiple chunks."},
    {"timestamp": [4.0, 7.25], "text": "For testing purposes."}
  ]
}"#;
    create_test_file(dir, filename, content)
}

/// Creates an executable fake engine script for driver tests (unix only)
#[cfg(unix)]
pub fn create_fake_engine(dir: &PathBuf, filename: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let script = format!("#!/bin/sh\n{}\n", body);
    let path = create_test_file(dir, filename, &script)?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}
