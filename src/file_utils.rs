use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::document::Document;
use crate::errors::ScriptError;

// @module: File and directory utilities

/// UTF-8 byte-order mark
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Suffix of the untouched dialogue file written by extraction
pub const UNTOUCHED_SUFFIX: &str = "_dich";
/// Suffix of the protected dialogue file written by extraction
pub const PROTECTED_SUFFIX: &str = "_goc_protected";
/// Suffix of the mapping file written by extraction
pub const MAPPING_SUFFIX: &str = "_mapping";
/// Suffix of the restored file written by placeholder restoration
pub const RESTORED_SUFFIX: &str = "_dich_final";
/// Suffix of the translated script written by reinsertion
pub const TRANSLATED_SUFFIX: &str = "_translated";

/// Paths written by the extraction step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPaths {
    pub untouched: PathBuf,
    pub protected: PathBuf,
    pub mapping: PathBuf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @returns: File stem as an owned string
    fn stem_of(path: &Path) -> String {
        path.file_stem().unwrap_or_default().to_string_lossy().to_string()
    }

    // @generates: Output paths for the extraction step
    pub fn extraction_paths<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2) -> ExtractionPaths {
        let stem = Self::stem_of(input_file.as_ref());
        let output_dir = output_dir.as_ref();

        ExtractionPaths {
            untouched: output_dir.join(format!("{}{}.txt", stem, UNTOUCHED_SUFFIX)),
            protected: output_dir.join(format!("{}{}.txt", stem, PROTECTED_SUFFIX)),
            mapping: output_dir.join(format!("{}{}.json", stem, MAPPING_SUFFIX)),
        }
    }

    // @generates: Output path for the restored dialogue file
    pub fn restored_path<P1: AsRef<Path>, P2: AsRef<Path>>(protected_file: P1, output_dir: P2) -> PathBuf {
        let stem = Self::stem_of(protected_file.as_ref()).replace(PROTECTED_SUFFIX, "");
        output_dir.as_ref().join(format!("{}{}.txt", stem, RESTORED_SUFFIX))
    }

    // @generates: Output path for the translated script
    pub fn translated_script_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        script_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = Self::stem_of(script_file.as_ref());
        output_dir.as_ref().join(format!("{}{}.{}", stem, TRANSLATED_SUFFIX, extension))
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Decode bytes as UTF-8, tolerating a leading byte-order mark.
    /// Returns the text without the mark and whether it was present.
    pub fn decode_utf8(bytes: Vec<u8>, path: &Path) -> Result<(String, bool), ScriptError> {
        let has_bom = bytes.starts_with(UTF8_BOM);
        let body = if has_bom {
            bytes[UTF8_BOM.len()..].to_vec()
        } else {
            bytes
        };

        String::from_utf8(body)
            .map(|text| (text, has_bom))
            .map_err(|e| ScriptError::InvalidEncoding {
                path: path.display().to_string(),
                offset: e.utf8_error().valid_up_to() + if has_bom { UTF8_BOM.len() } else { 0 },
            })
    }

    /// Read a UTF-8 file to a string, dropping a leading byte-order mark
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        let (text, _) = Self::decode_utf8(bytes, path)?;
        Ok(text)
    }

    /// Read a script file as a document, remembering a leading byte-order mark
    pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        let (text, has_bom) = Self::decode_utf8(bytes, path)?;
        Ok(Document::from_text(&text, has_bom))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
