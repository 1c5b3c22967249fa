use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::document::{DialogueKind, parse_translated};
use crate::extractor::MatchRules;
use crate::file_utils::{ExtractionPaths, FileManager};
use crate::pipeline::extract_and_protect;
use crate::placeholder::{self, TokenMapping};
use crate::reinsertion::{ReinsertionEngine, ReinsertionReport};

// @module: Application controller for the three processing modes

/// Result of extracting one script (mode 1)
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub source: PathBuf,
    pub paths: ExtractionPaths,
    pub dialogue_count: usize,
    pub placeholder_count: usize,
}

/// Result of restoring placeholders (mode 2)
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    pub output: PathBuf,
    pub keys_found: usize,
    pub unknown_keys: Vec<String>,
}

/// Result of applying translations to a script (mode 3)
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub output: PathBuf,
    pub report: ReinsertionReport,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn rules(&self) -> MatchRules {
        MatchRules::from(&self.config)
    }

    fn require_file(path: &Path) -> Result<()> {
        if !FileManager::file_exists(path) {
            return Err(anyhow!("Input file does not exist: {:?}", path));
        }
        Ok(())
    }

    /// Mode 1: extract dialogue from a script and write the untouched text,
    /// the protected text and the placeholder mapping
    pub fn extract_file(&self, input_file: &Path, output_dir: &Path) -> Result<ExtractionOutcome> {
        Self::require_file(input_file)?;
        info!("Extracting dialogue from {:?}", input_file);

        let document = FileManager::read_document(input_file)?;
        let artifacts = extract_and_protect(&document, &self.rules());
        info!("Found {} dialogue line(s)", artifacts.records.len());

        let counts = artifacts.kind_counts();
        for kind in DialogueKind::PRIORITY {
            let count = counts.get(&kind).copied().unwrap_or(0);
            debug!("  {}: {}", kind, count);
        }

        let mapping_json = artifacts
            .mapping
            .to_json_pretty()
            .context("Failed to serialize placeholder mapping")?;

        FileManager::ensure_dir(output_dir)?;
        let paths = FileManager::extraction_paths(input_file, output_dir);
        FileManager::write_to_file(&paths.untouched, &artifacts.untouched)?;
        FileManager::write_to_file(&paths.protected, &artifacts.protected)?;
        FileManager::write_to_file(&paths.mapping, &mapping_json)?;

        info!("Success:");
        info!("  - {}", paths.untouched.display());
        info!("  - {}", paths.protected.display());
        info!("  - {}", paths.mapping.display());
        info!("  - Total placeholders: {}", artifacts.mapping.len());

        Ok(ExtractionOutcome {
            source: input_file.to_path_buf(),
            paths,
            dialogue_count: artifacts.records.len(),
            placeholder_count: artifacts.mapping.len(),
        })
    }

    /// Mode 1 over every script under a directory.
    ///
    /// Each script gets its own mapping. Outputs go next to each script, or when
    /// `output_dir` is given, into the same relative subdirectory under it.
    /// Failures are logged and the walk continues.
    pub fn extract_folder(&self, input_dir: &Path, output_dir: Option<&Path>) -> Result<Vec<ExtractionOutcome>> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let scripts = FileManager::find_files(input_dir, &self.config.script_extension)?;
        if scripts.is_empty() {
            warn!("No .{} files found in {:?}", self.config.script_extension, input_dir);
            return Ok(Vec::new());
        }

        info!("Processing {} script(s) in {:?}", scripts.len(), input_dir);

        let progress = ProgressBar::new(scripts.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut outcomes = Vec::new();
        for script in &scripts {
            progress.set_message(script.file_name().unwrap_or_default().to_string_lossy().to_string());

            let script_dir = script.parent().unwrap_or(Path::new("."));
            let target_dir = match output_dir {
                // Mirror the script's subdirectory so equal stems never collide
                Some(dir) => dir.join(script_dir.strip_prefix(input_dir).unwrap_or(Path::new(""))),
                None => script_dir.to_path_buf(),
            };

            match self.extract_file(script, &target_dir) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Error processing {:?}: {:#}", script, e),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Finished processing {}/{} scripts", outcomes.len(), scripts.len());
        Ok(outcomes)
    }

    /// Mode 2: restore placeholders in a translated protected file
    pub fn restore_file(&self, protected_file: &Path, mapping_file: &Path, output_dir: &Path) -> Result<RestoreOutcome> {
        Self::require_file(protected_file)?;
        Self::require_file(mapping_file)?;
        info!("Restoring placeholders in {:?}", protected_file);

        let mapping_json = FileManager::read_to_string(mapping_file)?;
        let mapping = TokenMapping::from_json(&mapping_json)
            .with_context(|| format!("Failed to load mapping file: {:?}", mapping_file))?;
        let protected = FileManager::read_to_string(protected_file)?;

        let audit = placeholder::audit(&protected, &mapping);
        if !audit.unused_keys.is_empty() {
            debug!("{} mapping key(s) do not occur in the text", audit.unused_keys.len());
        }
        let restored = placeholder::restore_all(&protected, &mapping);

        FileManager::ensure_dir(output_dir)?;
        let output = FileManager::restored_path(protected_file, output_dir);
        FileManager::write_to_file(&output, &restored)?;

        info!("Success: {}", output.display());

        Ok(RestoreOutcome {
            output,
            keys_found: audit.occurrences,
            unknown_keys: audit.unknown_keys,
        })
    }

    /// Mode 3: write translated dialogue back into the original script
    pub fn apply_file(&self, translation_file: &Path, script_file: &Path, output_dir: &Path) -> Result<ApplyOutcome> {
        Self::require_file(translation_file)?;
        Self::require_file(script_file)?;
        info!("Applying translations to {:?}", script_file);

        let translations = parse_translated(&FileManager::read_to_string(translation_file)?);
        let document = FileManager::read_document(script_file)?;

        let engine = ReinsertionEngine::new(self.rules());
        let (translated, report) = engine.apply(&translations, &document);

        if !report.out_of_range.is_empty() {
            warn!("{} translation(s) address lines outside the script", report.out_of_range.len());
        }
        if !report.unmatched.is_empty() {
            warn!("{} translation(s) target lines without dialogue", report.unmatched.len());
        }

        FileManager::ensure_dir(output_dir)?;
        let output = FileManager::translated_script_path(script_file, output_dir, &self.config.script_extension);
        FileManager::write_to_file(&output, &translated.to_text())?;

        info!("Success: {}", output.display());
        info!("  - Lines translated: {}/{}", report.applied, report.requested);

        Ok(ApplyOutcome { output, report })
    }
}
