/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use rpytl::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "script.rpy", "label start:")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_script_12345.rpy"));
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test the three extraction output names
#[test]
fn test_extraction_paths_withScript_shouldDeriveFromStem() {
    let paths = FileManager::extraction_paths("/game/script.rpy", "/out");

    assert_eq!(paths.untouched, Path::new("/out/script_dich.txt"));
    assert_eq!(paths.protected, Path::new("/out/script_goc_protected.txt"));
    assert_eq!(paths.mapping, Path::new("/out/script_mapping.json"));
}

/// Test the restored output name strips the protected suffix
#[test]
fn test_restored_path_withProtectedFile_shouldStripSuffix() {
    let path = FileManager::restored_path("/out/script_goc_protected.txt", "/final");
    assert_eq!(path, Path::new("/final/script_dich_final.txt"));

    let path = FileManager::restored_path("/out/other.txt", ".");
    assert_eq!(path, Path::new("./other_dich_final.txt"));
}

/// Test the translated script name uses the configured extension
#[test]
fn test_translated_script_path_withExtension_shouldAppendSuffix() {
    let path = FileManager::translated_script_path("/game/script.rpy", "/out", "rpy");
    assert_eq!(path, Path::new("/out/script_translated.rpy"));
}

/// Test that a byte-order mark is stripped but remembered
#[test]
fn test_read_document_withBom_shouldRememberIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("bom.rpy");
    fs::write(&path, b"\xEF\xBB\xBFe \"Hi\"\n")?;

    let document = FileManager::read_document(&path)?;

    assert!(document.has_bom());
    assert_eq!(document.line(1), Some("e \"Hi\""));
    assert_eq!(FileManager::read_to_string(&path)?, "e \"Hi\"\n");
    Ok(())
}

/// Test that invalid UTF-8 is reported as an error
#[test]
fn test_read_document_withInvalidUtf8_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("latin1.rpy");
    fs::write(&path, b"e \"caf\xE9\"\n")?;

    let error = FileManager::read_document(&path).unwrap_err();

    assert!(error.to_string().contains("not valid UTF-8"));
    assert!(error.to_string().contains("offset 6"));
    Ok(())
}

/// Test that find_files walks subdirectories and filters by extension
#[test]
fn test_find_files_withNestedScripts_shouldFindOnlyMatchingExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let sub = temp_dir.path().join("chapter1");
    fs::create_dir(&sub)?;
    common::create_test_file(temp_dir.path(), "script.rpy", "")?;
    common::create_test_file(&sub, "intro.RPY", "")?;
    common::create_test_file(&sub, "notes.txt", "")?;

    let found = FileManager::find_files(temp_dir.path(), ".rpy")?;

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap().eq_ignore_ascii_case("rpy")));
    Ok(())
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("new").join("out.txt");

    FileManager::write_to_file(&path, "1|||Hi\n")?;

    assert_eq!(fs::read_to_string(&path)?, "1|||Hi\n");
    Ok(())
}
