/*!
 * Tests for file utilities
 */

use std::path::Path;

use subgen::file_utils::{FileManager, FileType};

use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withRealAndMissingFiles_shouldDiscriminate() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&dir, "present.txt", "content").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.join("absent.txt")));
    // A directory is not a file
    assert!(!FileManager::file_exists(&dir));
    assert!(FileManager::dir_exists(&dir));
}

/// Test directory creation including parents
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));

    // Idempotent on an existing directory
    assert!(FileManager::ensure_dir(&nested).is_ok());
}

/// Test output path generation from an input file
#[test]
fn test_generate_output_path_withSuffixAndExtension_shouldComposeName() {
    let path = FileManager::generate_output_path(
        Path::new("/videos/episode.mkv"),
        Path::new("/out"),
        "",
        "srt",
    );
    assert_eq!(path, Path::new("/out/episode.srt"));

    let path = FileManager::generate_output_path(
        Path::new("/videos/episode.mkv"),
        Path::new("/out"),
        "_subtitled",
        "mp4",
    );
    assert_eq!(path, Path::new("/out/episode_subtitled.mp4"));
}

/// Test write and read round trip with parent directory creation
#[test]
fn test_write_to_file_withMissingParent_shouldCreateAndWrite() {
    let temp_dir = common::create_temp_dir().unwrap();
    let target = temp_dir.path().join("nested").join("out.srt");

    FileManager::write_to_file(&target, common::sample_srt()).unwrap();

    let read_back = FileManager::read_to_string(&target).unwrap();
    assert_eq!(read_back, common::sample_srt());
}

/// Test reading a missing file fails with context
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let error = FileManager::read_to_string("/nonexistent/file.srt").unwrap_err();
    assert!(error.to_string().contains("Failed to read file"));
}

/// Test file type detection by extension
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let subtitle = common::create_test_subtitle(&dir, "movie.srt").unwrap();
    let video = common::create_test_file(&dir, "movie.mkv", "fake video bytes").unwrap();
    let other = common::create_test_file(&dir, "notes.txt", "just text").unwrap();

    assert_eq!(FileManager::detect_file_type(&subtitle).unwrap(), FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&video).unwrap(), FileType::Video);
    assert_eq!(FileManager::detect_file_type(&other).unwrap(), FileType::Unknown);
}

/// Test content-based SRT detection for files without the .srt extension
#[test]
fn test_detect_file_type_withSrtContentAndWrongExtension_shouldDetectSubtitle() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&dir, "subtitle.txt", common::sample_srt()).unwrap();

    assert_eq!(FileManager::detect_file_type(&file).unwrap(), FileType::Subtitle);
}

/// Test detection on a missing file fails
#[test]
fn test_detect_file_type_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("/nonexistent/file.mkv").is_err());
}
