use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Extension used for translated script output (without the dot)
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    /// Minimum indentation for a non quote-led line to count as a menu choice
    #[serde(default = "default_menu_indent_threshold")]
    pub menu_indent_threshold: usize,

    /// Prefix marking a comment line
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script_extension: default_script_extension(),
            menu_indent_threshold: default_menu_indent_threshold(),
            comment_marker: default_comment_marker(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.script_extension.trim().is_empty() {
            return Err(anyhow!("Script extension cannot be empty"));
        }

        if self.script_extension.starts_with('.') {
            return Err(anyhow!(
                "Script extension must not start with a dot: {}",
                self.script_extension
            ));
        }

        if self.menu_indent_threshold == 0 {
            return Err(anyhow!("Menu indent threshold must be at least 1"));
        }

        if self.comment_marker.is_empty() {
            return Err(anyhow!("Comment marker cannot be empty"));
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;

        Ok(())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_script_extension() -> String {
    "rpy".to_string()
}

fn default_menu_indent_threshold() -> usize {
    4
}

fn default_comment_marker() -> String {
    "#".to_string()
}
