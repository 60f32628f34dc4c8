/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use vidscribe::file_utils::{FileManager, VIDEO_EXTENSIONS};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(&temp_dir.path().to_path_buf(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(test_file.to_str().unwrap()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns true for existing directories
#[test]
fn test_dir_exists_withExistingDir_shouldReturnTrue() {
    assert!(FileManager::dir_exists("."));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that ensure_dir creates missing directories
#[test]
fn test_ensure_dir_withMissingNestedDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test that sibling_path keeps the stem and swaps directory and extension
#[test]
fn test_sibling_path_withValidInputs_shouldDeriveDeterministicPath() {
    let input_file = Path::new("/tmp/video/episode01.mkv");
    let output_dir = Path::new("/tmp/audio");

    let output_path = FileManager::sibling_path(input_file, output_dir, "mp3");

    assert_eq!(output_path, Path::new("/tmp/audio/episode01.mp3"));
}

/// The same stem maps through every pipeline stage
#[test]
fn test_sibling_path_withChainedStages_shouldKeepStemStable() {
    let video = Path::new("video/clip.mp4");
    let audio = FileManager::sibling_path(video, "audio", "mp3");
    let transcript = FileManager::sibling_path(&audio, "json", "json");
    let subtitle = FileManager::sibling_path(&transcript, "srt", "srt");

    assert_eq!(audio, Path::new("audio/clip.mp3"));
    assert_eq!(transcript, Path::new("json/clip.json"));
    assert_eq!(subtitle, Path::new("srt/clip.srt"));
}

/// Test finding files by extension
#[test]
fn test_find_files_withMixedExtensions_shouldFilterByExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "one.mp4", "")?;
    common::create_test_file(&dir, "two.MP4", "")?;
    common::create_test_file(&dir, "notes.txt", "")?;

    let files = FileManager::find_files(&dir, "mp4")?;

    // Extension match is case-insensitive
    assert_eq!(files.len(), 2);
    Ok(())
}

/// Only files in the container allow-list are enumerated as videos
#[test]
fn test_find_video_files_withMixedDirectory_shouldApplyAllowList() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.mp4", "")?;
    common::create_test_file(&dir, "b.mkv", "")?;
    common::create_test_file(&dir, "c.avi", "")?;
    common::create_test_file(&dir, "d.mov", "")?;
    common::create_test_file(&dir, "e.srt", "")?;
    common::create_test_file(&dir, "f.mp3", "")?;

    let files = FileManager::find_video_files(&dir)?;

    assert_eq!(files.len(), VIDEO_EXTENSIONS.len());
    assert!(files.iter().all(|f| {
        let ext = f.extension().unwrap().to_string_lossy().to_lowercase();
        VIDEO_EXTENSIONS.contains(&ext.as_str())
    }));
    Ok(())
}

/// Test that write_to_file creates parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateParentAndWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("nested").join("output.srt");

    FileManager::write_to_file(&target, "subtitle body")?;

    assert_eq!(FileManager::read_to_string(&target)?, "subtitle body");
    Ok(())
}

/// Test timestamped log appending
#[test]
fn test_append_to_log_file_withTwoEntries_shouldAppendBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log_path, "first entry")?;
    FileManager::append_to_log_file(&log_path, "second entry")?;

    let content = FileManager::read_to_string(&log_path)?;
    assert!(content.contains("first entry"));
    assert!(content.contains("second entry"));
    assert_eq!(content.lines().count(), 2);
    Ok(())
}
